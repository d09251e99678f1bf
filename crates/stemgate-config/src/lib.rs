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

//! Environment-backed configuration for the Stemgate service.
//!
//! Layout: `model.rs` (typed config models and defaults), `validate.rs`
//! (parsing helpers), `loader.rs` (environment lookup and assembly).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_from, load_from_env};
pub use model::{AppConfig, HttpConfig, LimitsConfig, SmtpConfig, StorageConfig, ToolsConfig};
