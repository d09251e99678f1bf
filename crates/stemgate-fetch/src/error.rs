//! Error types for media fetch runs.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors produced while invoking the downloader.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The downloader process could not be spawned or awaited.
    #[error("downloader process failure")]
    Process {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The downloader exited unsuccessfully.
    #[error("downloader exited with failure")]
    Failed {
        /// Exit code when the process was not killed by a signal.
        code: Option<i32>,
        /// Trailing stderr output captured from the run.
        stderr: String,
    },
    /// The run exceeded the configured ceiling and was killed.
    #[error("download timed out")]
    TimedOut {
        /// Configured per-run ceiling.
        limit: Duration,
    },
    /// The downloader reported success but the expected file is absent.
    #[error("downloaded file missing")]
    MissingOutput {
        /// Path that was expected to exist.
        path: PathBuf,
    },
    /// Admission was unavailable because the fetcher is shutting down.
    #[error("download admission closed")]
    AdmissionClosed,
}

impl FetchError {
    pub(crate) const fn process(operation: &'static str, source: io::Error) -> Self {
        Self::Process { operation, source }
    }
}
