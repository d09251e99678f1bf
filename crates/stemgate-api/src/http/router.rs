//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router, middleware,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request, header::CONTENT_TYPE},
    routing::{get, post},
};
use stemgate_config::HttpConfig;
use stemgate_telemetry::build_sha;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::Span;

use crate::http::HEADER_REQUEST_ID;
use crate::http::handlers::{download_and_separate, download_youtube, hello, read_item, separate};
use crate::http::health::{health, metrics};
use crate::http::telemetry::record_http_metrics;
use crate::state::ApiState;

/// Upload body ceiling; source audio tracks run to hundreds of megabytes.
const UPLOAD_BODY_LIMIT: usize = 512 * 1024 * 1024;

/// Axum router wrapper that hosts the Stemgate API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the server with shared dependencies wired through state.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured CORS origin is not a valid
    /// header value.
    pub fn new(http: &HttpConfig, state: Arc<ApiState>) -> Result<Self> {
        let cors_layer = Self::cors_layer(http.cors_origin.as_deref())?;
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    let status = response.status().as_u16();
                    span.record("status_code", status);
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(trace_layer)
            .layer(middleware::from_fn_with_state(
                state.telemetry.clone(),
                record_http_metrics,
            ));

        let router = Self::build_router(&state)
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Ok(Self { router })
    }

    fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        Ok(match origin {
            Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
            None => layer.allow_origin(Any),
        })
    }

    fn build_router(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        Router::new()
            .route("/", get(hello))
            .route("/items/{item_id}", get(read_item))
            .route(
                "/separate",
                post(separate).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
            )
            .route("/download-youtube", post(download_youtube))
            .route("/download-and-separate", post(download_and_separate))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .nest_service("/audio", ServeDir::new(state.store.audio_mount_dir()))
            .nest_service("/downloads", ServeDir::new(state.store.downloads_dir()))
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server
    /// terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        tracing::info!("Starting API on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router.into_make_service()).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}
