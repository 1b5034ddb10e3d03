//! Response handling and transformation.
//!
//! # Responsibilities
//! - Shape the forwarder's output as a JSON response
//! - Map failures to one plain-text line with a trailing newline
//!
//! # Design Decisions
//! - Error bodies are a single line ending in "\n"
//! - A JSON encoding failure is logged and degrades to a generic 500;
//!   it is not a distinct client-visible error

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Build a plain-text error response: one line, trailing newline.
pub fn plain_error(status: StatusCode, message: &str) -> Response {
    let mut response = (status, format!("{message}\n")).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Serialize a value as a 200 JSON response.
pub fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode response body");
            plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
