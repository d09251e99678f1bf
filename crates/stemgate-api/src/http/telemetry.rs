//! Request counting middleware.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use stemgate_telemetry::Metrics;

/// Count the request against its matched route once the response is ready.
///
/// Requests that miss every route (including static-mount traffic) fall back
/// to the raw URI path so they still appear under a label.
pub(crate) async fn record_http_metrics(
    State(telemetry): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request.extensions().get::<MatchedPath>().map_or_else(
        || request.uri().path().to_string(),
        |matched| matched.as_str().to_string(),
    );
    let response = next.run(request).await;
    telemetry.inc_http_request(&route, response.status().as_u16());
    response
}
