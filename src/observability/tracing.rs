//! Per-request spans.
//!
//! Every request gets an `http_request` span carrying method, URI and the
//! request ID assigned by [`crate::http::request`].

use axum::extract::Request;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};

use crate::http::request::RequestIdExt;

/// Build the span for a request.
pub fn make_request_span(request: &Request) -> ::tracing::Span {
    ::tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id().unwrap_or("unknown"),
    )
}

/// `TraceLayer` wired to [`make_request_span`].
pub fn trace_layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request) -> ::tracing::Span> {
    TraceLayer::new_for_http().make_span_with(make_request_span as fn(&Request) -> ::tracing::Span)
}
