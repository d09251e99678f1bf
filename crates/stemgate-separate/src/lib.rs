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

//! Source separation via an external demucs process.
//!
//! # Design
//! - The separator is a black box; this crate only sequences its invocation.
//! - Admission is bounded by a semaphore so a burst of requests cannot fork
//!   an unbounded number of model processes.
//! - Each run is capped by a timeout; a timed-out child is killed.

pub mod engine;
pub mod error;

pub use engine::{DemucsEngine, SeparationEngine};
pub use error::{SeparateError, SeparateResult};
