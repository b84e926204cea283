//! Liveness endpoint.

use axum::http::StatusCode;

/// Route path of the liveness endpoint.
pub const PING_PATH: &str = "/ping";

/// `HEAD /ping`
pub async fn ping() -> StatusCode {
    StatusCode::OK
}
