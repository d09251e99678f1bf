//! Typed configuration models and their defaults.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Fully resolved service configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// HTTP listener and public URL settings.
    pub http: HttpConfig,
    /// Artifact directory settings.
    pub storage: StorageConfig,
    /// External tool settings.
    pub tools: ToolsConfig,
    /// Concurrency and timeout bounds.
    pub limits: LimitsConfig,
    /// Outbound mail relay; `None` disables notifications.
    pub smtp: Option<SmtpConfig>,
}

/// HTTP listener and public URL settings.
#[derive(Debug, Clone, Serialize)]
pub struct HttpConfig {
    /// Address the listener binds to.
    pub bind_addr: IpAddr,
    /// Port the listener binds to.
    pub port: u16,
    /// Base URL prepended to artifact paths in responses.
    pub public_url: String,
    /// Allowed CORS origin; `None` permits any origin.
    pub cors_origin: Option<String>,
}

/// Artifact directory settings.
#[derive(Debug, Clone, Serialize)]
pub struct StorageConfig {
    /// Root directory holding uploads, downloads, and separated output.
    pub data_dir: PathBuf,
}

/// External tool settings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolsConfig {
    /// Separation model name; also the output subdirectory demucs creates.
    pub demucs_model: String,
}

/// Concurrency and timeout bounds for external tool invocations.
#[derive(Debug, Clone, Serialize)]
pub struct LimitsConfig {
    /// Maximum concurrent separation runs.
    pub max_separations: usize,
    /// Maximum concurrent media downloads.
    pub max_downloads: usize,
    /// Per-run ceiling for a separation invocation.
    pub separate_timeout: Duration,
    /// Per-run ceiling for a download invocation.
    pub download_timeout: Duration,
}

/// Outbound mail relay settings.
#[derive(Debug, Clone, Serialize)]
pub struct SmtpConfig {
    /// Relay hostname.
    pub host: String,
    /// Relay submission port.
    pub port: u16,
    /// Authentication username.
    pub user: String,
    /// Authentication password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Sender address for notification mail.
    pub from: String,
}

impl HttpConfig {
    /// Socket address string suitable for binding a listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
