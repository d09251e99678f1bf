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

//! Artifact store for the separation pipeline.
//!
//! # Design
//! - One place owns the uploads/downloads/separated directory layout; nothing
//!   else builds artifact paths by hand.
//! - Job names are derived once, by [`JobName::derive`], and reused verbatim
//!   for download output and separated-output lookup.
//! - Public URLs are assembled here so handlers never concatenate strings.

pub mod error;
pub mod job;
pub mod service;

pub use error::{StoreError, StoreResult};
pub use job::{JobName, sanitize_file_name};
pub use service::ArtifactStore;
