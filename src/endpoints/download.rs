//! Download endpoint: a fixed-size block of zero bytes served as a file.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method},
    response::IntoResponse,
};

use crate::http::server::AppState;
use crate::observability::metrics::{self, Direction};

/// Route path of the download endpoint.
pub const DOWNLOAD_PATH: &str = "/testfile.bin";

/// Value of the `Content-Disposition` header on downloads.
pub const CONTENT_DISPOSITION: &str = "attachment; filename=testfile.bin";

/// Build a zero-filled payload of `len` bytes.
pub fn zero_payload(len: usize) -> Bytes {
    Bytes::from(vec![0u8; len])
}

/// `GET /testfile.bin`
///
/// Also answers `HEAD`, which sends no body and so is not counted.
pub async fn download(method: Method, State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.payload.clone();
    if method != Method::HEAD {
        metrics::record_bytes(Direction::Download, payload.len() as u64);
    }

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
            (header::CONTENT_LENGTH, HeaderValue::from(payload.len())),
            (header::CONTENT_DISPOSITION, HeaderValue::from_static(CONTENT_DISPOSITION)),
        ],
        payload,
    )
}
