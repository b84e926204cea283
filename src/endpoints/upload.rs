//! Upload endpoint: drain the request body and acknowledge it.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;

use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics::{self, Direction};

/// Route path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/upload";

/// Body sent once an upload has been fully received.
pub const UPLOAD_COMPLETE: &str = "Upload complete";

/// Reasons an upload is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read upload body: {0}")]
    Body(#[from] axum::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Body(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// Consume `body` chunk by chunk, returning the number of bytes seen.
///
/// Chunks are dropped as soon as they are counted.
pub async fn drain_body(body: Body, limit: Option<usize>) -> Result<u64, UploadError> {
    let mut stream = body.into_data_stream();
    let mut received: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        received += chunk.len() as u64;

        if let Some(limit) = limit {
            if received > limit as u64 {
                return Err(UploadError::TooLarge { limit });
            }
        }
    }

    Ok(received)
}

/// `POST /upload`
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<&'static str, UploadError> {
    let request_id = headers.request_id().unwrap_or("unknown");

    match drain_body(body, state.max_upload_bytes).await {
        Ok(received) => {
            metrics::record_bytes(Direction::Upload, received);
            tracing::debug!(request_id = %request_id, bytes = received, "Upload received");
            Ok(UPLOAD_COMPLETE)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Upload rejected");
            Err(e)
        }
    }
}
