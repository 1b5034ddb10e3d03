//! Error definitions for the forwarding pipeline.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while translating and dispatching one exchange.
///
/// Every variant is terminal for its exchange and maps to exactly one
/// status code and one plain-text message at the HTTP boundary. Nothing is
/// retried automatically; the caller may resubmit.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Payload was unreadable or not valid JSON for the request schema.
    #[error("invalid request payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The described method/URL/headers could not form an outbound call.
    #[error("could not build upstream request: {0}")]
    BuildRequest(String),

    /// Network-level failure contacting the origin (DNS, refused, TLS...).
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The origin connection dropped while reading the response body.
    #[error("failed to read upstream response body: {0}")]
    ResponseRead(#[source] reqwest::Error),
}

impl ForwardError {
    /// Status code reported to the client for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ForwardError::BuildRequest(_)
            | ForwardError::Upstream(_)
            | ForwardError::ResponseRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The single plain-text line reported to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            ForwardError::MalformedPayload(_) => "Invalid JSON format",
            ForwardError::BuildRequest(_) => "Can't create request",
            ForwardError::Upstream(_) => "Error making request to external service",
            ForwardError::ResponseRead(_) => "Can't read response body",
        }
    }
}

/// Result type for forwarding operations.
pub type ForwardResult<T> = Result<T, ForwardError>;
