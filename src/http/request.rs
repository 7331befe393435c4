//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the caller sends none
//! - Extract the question from the query string
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The same ID is echoed to the caller and forwarded to the backend
//! - The raw query string is read by hand; a repeated `pregunta` keeps the first value
//! - A missing `pregunta` is not an extractor rejection; the relay decides

use axum::http::HeaderName;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Query-string field carrying the question.
pub const QUESTION_FIELD: &str = "pregunta";

/// First decoded `pregunta` value of a raw query string.
pub fn question_from_query(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == QUESTION_FIELD)
        .map(|(_, value)| value.into_owned())
}
