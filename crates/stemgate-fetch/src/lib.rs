#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Remote media fetch via an external yt-dlp process.
//!
//! # Design
//! - One invocation per request, no retries; the caller surfaces failures.
//! - Output names key on the job name, never on the remote title, so the
//!   download and separation stages agree on paths for arbitrary titles.
//! - Admission is semaphore-bounded and each run is capped by a timeout.

pub mod error;
pub mod fetcher;

pub use error::{FetchError, FetchResult};
pub use fetcher::{FetchedMedia, MediaFetcher, YtDlpFetcher};
