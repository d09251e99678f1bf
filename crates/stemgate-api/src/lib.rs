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

//! HTTP surface for the Stemgate service.
//!
//! # Design
//! - Handlers talk to the pipeline through trait objects (`SeparationEngine`,
//!   `MediaFetcher`, `Notifier`) so the router is testable with stubs.
//! - The two download endpoints keep a soft-error contract: failures come
//!   back as HTTP 200 JSON envelopes with `success: false`.
//! - Artifacts are served from static mounts; handlers never stream files.

pub mod http;
pub mod state;

pub use http::router::ApiServer;
pub use state::ApiState;
