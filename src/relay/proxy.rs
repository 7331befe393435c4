//! The relay operation.
//!
//! # Responsibilities
//! - Validate the question and build the upstream request
//! - Send it through the shared, pooled client
//! - Classify the backend status
//! - Stream the backend body to the caller chunk by chunk
//!
//! # Design Decisions
//! - Headers are awaited, the body never is; chunks are forwarded as they arrive
//! - Dropping the caller's body drops the upstream body and its connection
//! - Content type is passed through without inspection

use std::time::Duration;

use axum::body::{Body, BodyDataStream, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use url::Url;

use crate::config::{BackendConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::query::Query;
use crate::relay::upstream::UpstreamRequest;
use crate::resilience::timeouts;

/// Content type used when the backend does not declare one.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Response handed back to the caller on success.
pub struct ClientResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Body,
}

impl std::fmt::Debug for ClientResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Forwards questions to the configured backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RelayProxy {
    client: Client<HttpConnector, Body>,
    base_url: Url,
    query_field: String,
    response_timeout: Duration,
    idle_timeout: Duration,
}

impl RelayProxy {
    /// Create a relay for `backend` with the given timeouts.
    pub fn new(backend: &BackendConfig, timeouts: &TimeoutConfig) -> Result<Self, url::ParseError> {
        let base_url = backend.base_url()?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(timeouts.pool_idle())
            .build(connector);

        Ok(Self {
            client,
            base_url,
            query_field: backend.query_field.clone(),
            response_timeout: timeouts.response(),
            idle_timeout: timeouts.idle(),
        })
    }

    /// Base URL every question is sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Relay `raw` to the backend.
    ///
    /// Fails with [`RelayError::InvalidQuery`] before any network activity if
    /// `raw` is missing or blank.
    pub async fn relay(
        &self,
        raw: Option<&str>,
        request_id: Option<&HeaderValue>,
    ) -> RelayResult<ClientResponse> {
        let query = Query::parse(raw)?;
        let request_id_str = request_id
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let upstream = UpstreamRequest::new(&self.base_url, &self.query_field, &query)
            .with_request_id(request_id.cloned());

        tracing::debug!(
            request_id = %request_id_str,
            url = %upstream.url(),
            "Forwarding query"
        );

        let request = upstream.into_http()?;
        let response: hyper::Response<hyper::body::Incoming> =
            timeouts::response_within(self.response_timeout, self.client.request(request))
                .await
                .inspect_err(|e| {
                    tracing::error!(request_id = %request_id_str, error = %e, "Backend unreachable");
                })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id_str,
                status = %status,
                "Backend returned non-success status"
            );
            return Err(RelayError::UpstreamError { status });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        let transfer = Transfer {
            chunks: Body::new(response.into_body()).into_data_stream(),
            idle: self.idle_timeout,
            request_id: request_id_str,
            bytes: 0,
            state: TransferState::Streaming,
        };

        Ok(ClientResponse {
            status,
            content_type,
            body: Body::from_stream(transfer.into_stream()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferState {
    Streaming,
    Done,
    Failed,
}

/// One backend body being copied to one caller.
struct Transfer {
    chunks: BodyDataStream,
    idle: Duration,
    request_id: String,
    bytes: u64,
    state: TransferState,
}

impl Transfer {
    fn into_stream(self) -> impl futures_util::Stream<Item = Result<Bytes, RelayError>> + Send {
        futures_util::stream::unfold(self, |mut transfer| async move {
            if transfer.state != TransferState::Streaming {
                return None;
            }
            match timeouts::next_within(transfer.idle, &mut transfer.chunks).await {
                Some(Ok(chunk)) => {
                    transfer.bytes += chunk.len() as u64;
                    Some((Ok(chunk), transfer))
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        request_id = %transfer.request_id,
                        bytes = transfer.bytes,
                        error = %e,
                        "Backend stream interrupted"
                    );
                    transfer.state = TransferState::Failed;
                    Some((Err(e), transfer))
                }
                None => {
                    transfer.finish();
                    None
                }
            }
        })
    }
}

impl Transfer {
    /// Mark the backend body as fully copied; reported when the transfer drops.
    fn finish(&mut self) {
        self.state = TransferState::Done;
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        let outcome = match self.state {
            TransferState::Done => {
                tracing::debug!(request_id = %self.request_id, bytes = self.bytes, "Relay complete");
                "complete"
            }
            TransferState::Failed => "interrupted",
            TransferState::Streaming => {
                tracing::debug!(
                    request_id = %self.request_id,
                    bytes = self.bytes,
                    "Caller went away, upstream released"
                );
                "cancelled"
            }
        };
        metrics::record_stream(outcome, self.bytes);
    }
}
