//! Demucs invocation behind the [`SeparationEngine`] seam.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stemgate_store::JobName;
use stemgate_telemetry::Metrics;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::{SeparateError, SeparateResult};

/// Maximum stderr bytes retained from a failed run.
const STDERR_TAIL: usize = 4_096;

/// Seam between HTTP handlers and the separator process.
#[async_trait]
pub trait SeparationEngine: Send + Sync {
    /// Separate `input` into stems; output location is derived from the job.
    async fn separate(&self, job: &JobName, input: &Path) -> SeparateResult<()>;
}

/// Separation engine that shells out to `python3 -m demucs`.
pub struct DemucsEngine {
    output_root: PathBuf,
    model: String,
    permits: Arc<Semaphore>,
    run_timeout: Duration,
    metrics: Metrics,
}

impl DemucsEngine {
    /// Build an engine writing under `output_root` with bounded admission.
    #[must_use]
    pub fn new(
        output_root: PathBuf,
        model: String,
        max_concurrent: usize,
        run_timeout: Duration,
        metrics: Metrics,
    ) -> Self {
        Self {
            output_root,
            model,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            run_timeout,
            metrics,
        }
    }

    fn command(&self, input: &Path) -> Command {
        let mut command = Command::new("python3");
        command
            .arg("-m")
            .arg("demucs")
            .arg("--mp3")
            .arg("--two-stems")
            .arg("vocals")
            .arg("-n")
            .arg(&self.model)
            .arg("-o")
            .arg(&self.output_root)
            .arg(input);
        command.kill_on_drop(true);
        command
    }

    async fn run(&self, job: &JobName, input: &Path) -> SeparateResult<()> {
        info!(job = %job, input = %input.display(), "starting separation");
        let output = tokio::time::timeout(self.run_timeout, self.command(input).output())
            .await
            .map_err(|_| SeparateError::TimedOut {
                limit: self.run_timeout,
            })?
            .map_err(|source| SeparateError::process("separate.spawn", source))?;

        if !output.status.success() {
            return Err(SeparateError::Failed {
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        info!(job = %job, "separation completed");
        Ok(())
    }
}

#[async_trait]
impl SeparationEngine for DemucsEngine {
    async fn separate(&self, job: &JobName, input: &Path) -> SeparateResult<()> {
        if tokio::fs::metadata(input).await.is_err() {
            return Err(SeparateError::MissingInput {
                path: input.to_path_buf(),
            });
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SeparateError::AdmissionClosed)?;

        self.metrics.add_separations_in_flight(1);
        let result = self.run(job, input).await;
        self.metrics.add_separations_in_flight(-1);

        match &result {
            Ok(()) => self.metrics.inc_separation("completed"),
            Err(SeparateError::TimedOut { limit }) => {
                warn!(job = %job, limit_secs = limit.as_secs(), "separation timed out");
                self.metrics.inc_separation("timed_out");
            }
            Err(err) => {
                warn!(job = %job, error = %err, "separation failed");
                self.metrics.inc_separation("failed");
            }
        }
        result
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_TAIL {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - STDERR_TAIL;
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    trimmed[start..].to_string()
}
