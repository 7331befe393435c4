//! Relay error taxonomy.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while relaying a query.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The question was missing or blank.
    #[error("query is missing or blank")]
    InvalidQuery,

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    UpstreamError { status: StatusCode },

    /// The backend could not be reached or did not answer in time.
    #[error("backend unreachable: {0}")]
    UpstreamUnreachable(#[from] UnreachableCause),

    /// The body stream broke after the response had started.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Why the backend could not be reached.
#[derive(Debug, Error)]
pub enum UnreachableCause {
    /// Connection refused, DNS failure, reset before headers, etc.
    #[error("transport failure: {0}")]
    Transport(#[source] hyper_util::client::legacy::Error),

    /// No response headers within the configured window.
    #[error("no response after {0:?}")]
    Timeout(Duration),

    /// The outbound request could not be assembled.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl RelayError {
    /// Short label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::InvalidQuery => "invalid_query",
            RelayError::UpstreamError { .. } => "upstream_error",
            RelayError::UpstreamUnreachable(UnreachableCause::Timeout(_)) => "upstream_timeout",
            RelayError::UpstreamUnreachable(_) => "upstream_unreachable",
            RelayError::StreamInterrupted(_) => "stream_interrupted",
        }
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
