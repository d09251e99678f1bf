//! Job naming shared by every pipeline stage.
//!
//! # Design
//! - One derivation function; the fetch path and the stem-lookup path must
//!   agree on the name or separated output becomes unreachable.
//! - Names are hex digests, so they are filesystem-safe for arbitrary source
//!   URLs and titles.

use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
const NAME_LEN: usize = 16;

/// Deterministic, filesystem-safe identifier for one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobName(String);

impl JobName {
    /// Derive the job name for a source identifier (URL or file name).
    #[must_use]
    pub fn derive(source: &str) -> Self {
        let digest = Sha256::digest(source.as_bytes());
        let mut name = hex::encode(digest);
        name.truncate(NAME_LEN);
        Self(name)
    }

    /// The name as a path-safe string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce an uploaded file name to a safe basename.
///
/// Strips any path components and replaces characters that are risky in a
/// shell-adjacent filesystem context. An empty result falls back to `upload`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let basename = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.');
    let cleaned: String = basename
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '.' | '-' | '_' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
