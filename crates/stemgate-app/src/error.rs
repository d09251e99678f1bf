//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: stemgate_config::ConfigError,
    },
    /// Artifact store operations failed.
    #[error("artifact store operation failed")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Source store error.
        source: stemgate_store::StoreError,
    },
    /// Notifier construction failed.
    #[error("notifier setup failed")]
    Notify {
        /// Operation identifier.
        operation: &'static str,
        /// Source notifier error.
        source: stemgate_notify::NotifyError,
    },
    /// Telemetry initialisation failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: stemgate_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn store(
        operation: &'static str,
        source: stemgate_store::StoreError,
    ) -> Self {
        Self::Store { operation, source }
    }

    pub(crate) const fn notify(
        operation: &'static str,
        source: stemgate_notify::NotifyError,
    ) -> Self {
        Self::Notify { operation, source }
    }

    pub(crate) fn telemetry(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Telemetry {
            operation,
            source: source.into(),
        }
    }

    pub(crate) fn api_server(operation: &'static str, source: anyhow::Error) -> Self {
        Self::ApiServer {
            operation,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            stemgate_config::ConfigError::IncompleteSection {
                section: "smtp",
                field: "STEMGATE_SMTP_HOST",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert!(config.source().is_some());

        let store = AppError::store(
            "store.open",
            stemgate_store::StoreError::InvalidInput {
                field: "file_name",
                reason: "must not be empty",
                value: None,
            },
        );
        assert!(matches!(store, AppError::Store { .. }));

        let telemetry = AppError::telemetry("telemetry.init", anyhow::anyhow!("already installed"));
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
        assert!(telemetry.source().is_some());
    }
}
