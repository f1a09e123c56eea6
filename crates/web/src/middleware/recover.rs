//! Panic recovery.
//!
//! A panicking handler must not take the connection task down with it.
//! [`recover_panic_layer`] turns the panic into a plain 500 and asks the
//! client to close the connection, since the handler may have left shared
//! state half-written.

use std::any::Any;

use axum::{
    http::{HeaderValue, StatusCode, header::CONNECTION},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

/// Converts a caught panic payload into a response.
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer that converts handler panics into `500 Internal Server Error`.
#[must_use]
pub fn recover_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::INTERNAL_SERVER_ERROR
            .canonical_reason()
            .unwrap_or("Internal Server Error"),
    )
        .into_response();
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    response
}
