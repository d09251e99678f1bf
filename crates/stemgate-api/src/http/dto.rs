//! Request and response bodies for the public endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `GET /`.
#[derive(Serialize)]
pub(crate) struct HelloResponse {
    #[serde(rename = "Hello")]
    pub(crate) hello: &'static str,
}

/// Query parameters of `GET /items/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemQuery {
    pub(crate) q: Option<String>,
}

/// Body of `GET /items/{id}`.
#[derive(Serialize)]
pub(crate) struct ItemResponse {
    pub(crate) item_id: i64,
    pub(crate) q: Option<String>,
}

/// Body shared by the two download endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct DownloadRequest {
    pub(crate) url: Option<String>,
    pub(crate) email: Option<String>,
}

/// Success body of `POST /download-youtube`.
#[derive(Serialize)]
pub(crate) struct DownloadResponse {
    pub(crate) success: bool,
    pub(crate) title: String,
    pub(crate) file_path: String,
    pub(crate) file_url: String,
}

/// Success body of `POST /download-and-separate`.
#[derive(Serialize)]
pub(crate) struct CombinedResponse {
    pub(crate) success: bool,
    pub(crate) title: String,
    pub(crate) separated_audio: BTreeMap<String, String>,
    pub(crate) email_sent: bool,
}

/// Soft error for a missing required field, served at HTTP 200.
#[derive(Serialize)]
pub(crate) struct MissingFieldResponse {
    pub(crate) error: &'static str,
}

/// Soft error for a failed pipeline run, served at HTTP 200.
#[derive(Serialize)]
pub(crate) struct FailureResponse {
    pub(crate) error: String,
    pub(crate) success: bool,
}

impl FailureResponse {
    pub(crate) const fn new(error: String) -> Self {
        Self {
            error,
            success: false,
        }
    }
}
