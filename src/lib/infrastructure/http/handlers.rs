//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use super::errors::ErrorResponse;

pub mod v1;

/// Turns a handler panic into a JSON 500 response. The panic payload is
/// logged, not echoed, since it may carry request data.
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    error!("handler panicked: {details}");

    let error = ErrorResponse {
        error: "Internal server error".to_string(),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}
