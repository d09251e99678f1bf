//! Public endpoint handlers.
//!
//! # Design
//! - The download endpoints never surface transport-level HTTP errors for
//!   pipeline failures; clients receive a JSON envelope at 200 and decide on
//!   `success`.
//! - Scratch inputs are deleted after separation on both success and failure
//!   paths; separated stems are left in place to be served statically.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::http::dto::{
    CombinedResponse, DownloadRequest, DownloadResponse, FailureResponse, HelloResponse,
    ItemQuery, ItemResponse, MissingFieldResponse,
};
use crate::http::errors::ApiError;
use crate::state::ApiState;

const MISSING_URL: &str = "YouTube URL is required";

pub(crate) async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse { hello: "World" })
}

pub(crate) async fn read_item(
    Path(item_id): Path<i64>,
    Query(query): Query<ItemQuery>,
) -> Json<ItemResponse> {
    Json(ItemResponse {
        item_id,
        q: query.q,
    })
}

pub(crate) async fn separate(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("malformed multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| ApiError::bad_request("multipart file name is required"))?;
        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(format!("failed to read upload: {err}")))?;
        upload = Some((file_name, data));
        break;
    }
    let (file_name, data) =
        upload.ok_or_else(|| ApiError::bad_request("multipart field 'file' is required"))?;

    let (job, input_path) = state
        .store
        .save_upload(&file_name, &data)
        .await
        .map_err(|err| ApiError::internal(error_chain(&err)))?;

    let separated = state.engine.separate(&job, &input_path).await;
    remove_scratch(&state, &input_path).await;
    separated.map_err(|err| ApiError::internal(error_chain(&err)))?;

    let stems = state
        .store
        .list_stems(&job)
        .await
        .map_err(|err| ApiError::internal(error_chain(&err)))?;
    Ok(Json(stems))
}

pub(crate) async fn download_youtube(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DownloadRequest>,
) -> Response {
    let Some(url) = requested_url(&request) else {
        return Json(MissingFieldResponse { error: MISSING_URL }).into_response();
    };

    match state.fetcher.fetch(&url).await {
        Ok(media) => Json(DownloadResponse {
            success: true,
            title: media.title,
            file_path: media.file_path.display().to_string(),
            file_url: state.store.download_url(&media.job),
        })
        .into_response(),
        Err(err) => Json(FailureResponse::new(error_chain(&err))).into_response(),
    }
}

pub(crate) async fn download_and_separate(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DownloadRequest>,
) -> Response {
    let Some(url) = requested_url(&request) else {
        return Json(MissingFieldResponse { error: MISSING_URL }).into_response();
    };

    let media = match state.fetcher.fetch(&url).await {
        Ok(media) => media,
        Err(err) => return Json(FailureResponse::new(error_chain(&err))).into_response(),
    };

    let separated = state.engine.separate(&media.job, &media.file_path).await;
    remove_scratch(&state, &media.file_path).await;
    if let Err(err) = separated {
        return Json(FailureResponse::new(error_chain(&err))).into_response();
    }

    let stems = match state.store.list_stems(&media.job).await {
        Ok(stems) => stems,
        Err(err) => return Json(FailureResponse::new(error_chain(&err))).into_response(),
    };

    let email_sent = match request.email.as_deref() {
        Some(email) => notify(&state, email, &media.title, &stems).await,
        None => false,
    };

    Json(CombinedResponse {
        success: true,
        title: media.title,
        separated_audio: stems,
        email_sent,
    })
    .into_response()
}

fn requested_url(request: &DownloadRequest) -> Option<String> {
    request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
}

async fn notify(
    state: &ApiState,
    email: &str,
    title: &str,
    stems: &BTreeMap<String, String>,
) -> bool {
    let Some(notifier) = &state.notifier else {
        warn!("notification requested but mail is not configured");
        state.telemetry.inc_notification("disabled");
        return false;
    };
    match notifier.send_stems(email, title, stems).await {
        Ok(()) => {
            state.telemetry.inc_notification("sent");
            true
        }
        Err(err) => {
            warn!(error = %error_chain(&err), "notification failed");
            state.telemetry.inc_notification("failed");
            false
        }
    }
}

async fn remove_scratch(state: &ApiState, path: &std::path::Path) {
    if let Err(err) = state.store.remove_scratch(path).await {
        warn!(path = %path.display(), error = %error_chain(&err), "scratch cleanup failed");
    }
}

/// Flatten an error and its sources into one human-readable string.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_chain_includes_sources() {
        let source = io::Error::other("relay unreachable");
        let err = stemgate_store::StoreError::Io {
            operation: "store.save_upload",
            path: "uploads/x.mp3".into(),
            source,
        };
        let chain = error_chain(&err);
        assert!(chain.starts_with("store io failure"));
        assert!(chain.contains("relay unreachable"));
    }

    #[test]
    fn requested_url_rejects_blank_values() {
        let request = DownloadRequest {
            url: Some("   ".to_string()),
            email: None,
        };
        assert!(requested_url(&request).is_none());

        let request = DownloadRequest {
            url: Some(" https://example.com ".to_string()),
            email: None,
        };
        assert_eq!(
            requested_url(&request).as_deref(),
            Some("https://example.com")
        );
    }
}
