//! HTTP modules: router, handlers, and middleware.

pub mod router;

pub(crate) mod dto;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod health;
pub(crate) mod telemetry;

/// Header carrying the per-request correlation id.
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
