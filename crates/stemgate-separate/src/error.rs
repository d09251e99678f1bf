//! Error types for separation runs.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for separation operations.
pub type SeparateResult<T> = Result<T, SeparateError>;

/// Errors produced while invoking the separator.
#[derive(Debug, Error)]
pub enum SeparateError {
    /// The input file was not present when the run started.
    #[error("separation input missing")]
    MissingInput {
        /// Path that was expected to exist.
        path: PathBuf,
    },
    /// The separator process could not be spawned or awaited.
    #[error("separator process failure")]
    Process {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The separator exited unsuccessfully.
    #[error("separator exited with failure")]
    Failed {
        /// Exit code when the process was not killed by a signal.
        code: Option<i32>,
        /// Trailing stderr output captured from the run.
        stderr: String,
    },
    /// The run exceeded the configured ceiling and was killed.
    #[error("separation timed out")]
    TimedOut {
        /// Configured per-run ceiling.
        limit: Duration,
    },
    /// Admission was unavailable because the engine is shutting down.
    #[error("separation admission closed")]
    AdmissionClosed,
}

impl SeparateError {
    pub(crate) const fn process(operation: &'static str, source: io::Error) -> Self {
        Self::Process { operation, source }
    }
}
