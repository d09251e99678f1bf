//! Shared application state for HTTP handlers.

use std::sync::Arc;

use stemgate_fetch::MediaFetcher;
use stemgate_notify::Notifier;
use stemgate_separate::SeparationEngine;
use stemgate_store::ArtifactStore;
use stemgate_telemetry::Metrics;

/// Dependencies shared by every handler.
pub struct ApiState {
    /// Artifact directory layout and URL builder.
    pub store: ArtifactStore,
    /// Separation engine seam.
    pub engine: Arc<dyn SeparationEngine>,
    /// Media fetcher seam.
    pub fetcher: Arc<dyn MediaFetcher>,
    /// Mail seam; `None` when notifications are disabled by configuration.
    pub notifier: Option<Arc<dyn Notifier>>,
    /// Shared metrics handle.
    pub telemetry: Metrics,
}

impl ApiState {
    /// Bundle handler dependencies into shared state.
    #[must_use]
    pub fn new(
        store: ArtifactStore,
        engine: Arc<dyn SeparationEngine>,
        fetcher: Arc<dyn MediaFetcher>,
        notifier: Option<Arc<dyn Notifier>>,
        telemetry: Metrics,
    ) -> Self {
        Self {
            store,
            engine,
            fetcher,
            notifier,
            telemetry,
        }
    }
}
