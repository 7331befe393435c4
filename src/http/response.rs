//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a successful relay into a streamed response
//! - Map relay errors to HTTP status codes and generic messages
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Backend error bodies and transport details are never echoed
//! - Backend timeouts result in 504 Gateway Timeout

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::relay::{ClientResponse, RelayError, UnreachableCause};

/// Body returned when the question is missing or blank.
pub const INVALID_QUERY_MESSAGE: &str = "La pregunta es requerida.";
/// Body returned when the backend answered with an error status.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Error en el backend.";
/// Body returned when the backend could not be reached.
pub const UNREACHABLE_MESSAGE: &str = "Backend no disponible.";

impl IntoResponse for ClientResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

impl RelayError {
    /// Status code the caller sees for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidQuery => StatusCode::BAD_REQUEST,
            // 1xx/3xx from the backend cannot be relayed without its body or headers.
            RelayError::UpstreamError { status } if status.is_client_error() || status.is_server_error() => {
                *status
            }
            RelayError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamUnreachable(UnreachableCause::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            RelayError::StreamInterrupted(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            RelayError::InvalidQuery => INVALID_QUERY_MESSAGE,
            RelayError::UpstreamError { .. } | RelayError::StreamInterrupted(_) => UPSTREAM_ERROR_MESSAGE,
            RelayError::UpstreamUnreachable(_) => UNREACHABLE_MESSAGE,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invalid_query_is_bad_request() {
        let res = RelayError::InvalidQuery.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(body_text(res).await, "La pregunta es requerida.");
    }

    #[tokio::test]
    async fn upstream_status_is_preserved_with_generic_body() {
        for status in [StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR, StatusCode::SERVICE_UNAVAILABLE] {
            let res = RelayError::UpstreamError { status }.into_response();
            assert_eq!(res.status(), status);
            assert_eq!(body_text(res).await, UPSTREAM_ERROR_MESSAGE);
        }
    }

    #[test]
    fn non_error_upstream_status_maps_to_bad_gateway() {
        let err = RelayError::UpstreamError { status: StatusCode::FOUND };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeouts_map_to_gateway_timeout() {
        let err = RelayError::from(UnreachableCause::Timeout(Duration::from_secs(3)));
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.outcome(), "upstream_timeout");
    }

    #[tokio::test]
    async fn unreachable_hides_details() {
        let err = RelayError::from(UnreachableCause::InvalidRequest("bad uri 10.0.0.1".into()));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_text(res).await, UNREACHABLE_MESSAGE);
    }
}
