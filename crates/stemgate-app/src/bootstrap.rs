//! Boot sequence wiring configuration, telemetry, and pipeline services into
//! the HTTP server.
//!
//! # Design
//! - Dependencies are constructed once at startup and injected into the API
//!   through [`ApiState`]; handlers never reach back into the environment.
//! - The notifier is optional: an absent SMTP section disables email without
//!   failing startup.

use std::net::SocketAddr;
use std::sync::Arc;

use stemgate_api::{ApiServer, ApiState};
use stemgate_config::{AppConfig, SmtpConfig, load_from_env};
use stemgate_fetch::{MediaFetcher, YtDlpFetcher};
use stemgate_notify::{Notifier, SmtpNotifier};
use stemgate_separate::{DemucsEngine, SeparationEngine};
use stemgate_store::ArtifactStore;
use stemgate_telemetry::{LoggingConfig, Metrics, init_logging};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the Stemgate application.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    config: AppConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment.
    pub(crate) fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::default();
        let config = load_from_env().map_err(|err| AppError::config("config.load", err))?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self {
            logging,
            config,
            telemetry,
        })
    }
}

/// Entry point for the Stemgate application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        logging,
        config,
        telemetry,
    } = dependencies;

    init_logging(&logging).map_err(|err| AppError::telemetry("telemetry.init", err))?;
    info!("Stemgate application bootstrap starting");

    let store =
        ArtifactStore::open(&config).map_err(|err| AppError::store("store.open", err))?;

    let engine: Arc<dyn SeparationEngine> = Arc::new(DemucsEngine::new(
        store.separated_root().to_path_buf(),
        config.tools.demucs_model.clone(),
        config.limits.max_separations,
        config.limits.separate_timeout,
        telemetry.clone(),
    ));
    let fetcher: Arc<dyn MediaFetcher> = Arc::new(YtDlpFetcher::new(
        store.clone(),
        config.limits.max_downloads,
        config.limits.download_timeout,
        telemetry.clone(),
    ));
    let notifier = build_notifier(config.smtp.as_ref())?;
    if notifier.is_none() {
        info!("email notifications disabled; no SMTP configuration");
    }

    let state = Arc::new(ApiState::new(store, engine, fetcher, notifier, telemetry));
    let api = ApiServer::new(&config.http, state)
        .map_err(|err| AppError::api_server("api_server.new", err))?;

    let addr = SocketAddr::new(config.http.bind_addr, config.http.port);
    info!(addr = %addr, "Launching API listener");
    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn build_notifier(smtp: Option<&SmtpConfig>) -> AppResult<Option<Arc<dyn Notifier>>> {
    let Some(smtp) = smtp else {
        return Ok(None);
    };
    let notifier =
        SmtpNotifier::new(smtp).map_err(|err| AppError::notify("notifier.new", err))?;
    Ok(Some(Arc::new(notifier)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_notifier_is_disabled_without_smtp_config() -> AppResult<()> {
        assert!(build_notifier(None)?.is_none());
        Ok(())
    }

    #[test]
    fn build_notifier_wraps_a_configured_transport() -> AppResult<()> {
        let smtp = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            from: "mailer@example.com".to_string(),
        };
        assert!(build_notifier(Some(&smtp))?.is_some());
        Ok(())
    }

    #[test]
    fn build_notifier_rejects_a_malformed_sender() {
        let smtp = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            from: "not an address".to_string(),
        };
        let err = build_notifier(Some(&smtp)).err().unwrap();
        assert!(matches!(err, AppError::Notify { .. }));
    }
}
