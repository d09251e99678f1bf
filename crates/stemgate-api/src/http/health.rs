//! Health and diagnostics endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::error;

use crate::http::errors::ApiError;
use crate::state::ApiState;
use stemgate_telemetry::build_sha;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) build: String,
    pub(crate) separations_in_flight: i64,
    pub(crate) downloads_in_flight: i64,
}

pub(crate) async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let snapshot = state.telemetry.snapshot();
    Json(HealthResponse {
        status: "ok",
        build: build_sha().to_string(),
        separations_in_flight: snapshot.separations_in_flight,
        downloads_in_flight: snapshot.downloads_in_flight,
    })
}

pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<String, ApiError> {
    state.telemetry.render().map_err(|err| {
        error!(error = %err, "failed to render metrics");
        ApiError::internal("failed to render metrics")
    })
}
