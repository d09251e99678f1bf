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

//! Email notification for completed separation jobs.
//!
//! # Design
//! - A fixed HTML layout; one link per stem, two alternating button styles.
//! - Transport is authenticated SMTP with STARTTLS; credentials come from
//!   configuration, never literals.
//! - Callers decide whether a send failure is fatal; here it is only an error
//!   value.

pub mod error;
pub mod mailer;
pub mod template;

pub use error::{NotifyError, NotifyResult};
pub use mailer::{Notifier, SmtpNotifier};
pub use template::render_stems_email;
