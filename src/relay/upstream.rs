//! Outbound request construction.
//!
//! # Responsibilities
//! - Combine the configured backend URL with the encoded question
//! - Carry the inbound request ID to the backend
//!
//! # Design Decisions
//! - Host, port and path come only from configuration
//! - The question is form-encoded into exactly one query field

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Uri};
use url::Url;

use crate::http::request::X_REQUEST_ID;
use crate::relay::error::UnreachableCause;
use crate::relay::query::Query;

/// A GET request for the backend's search endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    url: Url,
    request_id: Option<HeaderValue>,
}

impl UpstreamRequest {
    /// Build the request for `query` against `base`.
    ///
    /// Any query string already present on `base` is replaced.
    pub fn new(base: &Url, field: &str, query: &Query) -> Self {
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(field, query.as_str());
        Self {
            url,
            request_id: None,
        }
    }

    /// Forward the caller's request ID.
    pub fn with_request_id(mut self, request_id: Option<HeaderValue>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Convert into a request the hyper client can send.
    pub fn into_http(self) -> Result<Request<Body>, UnreachableCause> {
        let uri: Uri = self
            .url
            .as_str()
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| UnreachableCause::InvalidRequest(e.to_string()))?;

        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        if let Some(id) = self.request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }

        builder
            .body(Body::empty())
            .map_err(|e| UnreachableCause::InvalidRequest(e.to_string()))
    }
}
