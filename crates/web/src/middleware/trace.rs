//! Request logging via `tower_http::trace`.
//!
//! Every request gets an `http_request` span. The request ID middleware
//! fills in `request_id`; status and latency are recorded on the way out.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::{Level, Span, field};

type MakeRequestSpan = fn(&Request<Body>) -> Span;
type RecordResponse = fn(&Response<Body>, Duration, &Span);

/// The configured tracing layer type.
pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeRequestSpan,
    DefaultOnRequest,
    RecordResponse,
>;

/// Build the request logging layer.
#[must_use]
pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as MakeRequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(record_response as RecordResponse)
}

fn make_request_span(request: &Request<Body>) -> Span {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| field::display(addr.ip()));

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        remote_addr,
        request_id = field::Empty,
        status = field::Empty,
        latency_ms = field::Empty,
    )
}

fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::new()
        .level(Level::INFO)
        .on_response(response, latency, span);
}
