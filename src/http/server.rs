//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and health handlers
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{request_id::MakeRequestUuid, trace::TraceLayer, ServiceBuilderExt};

use crate::config::RelayConfig;
use crate::http::request::{question_from_query, X_REQUEST_ID};
use crate::observability::metrics;
use crate::relay::RelayProxy;

/// Inbound path of the relay endpoint.
pub const RELAY_PATH: &str = "/api/proxy";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayProxy,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, url::ParseError> {
        let relay = RelayProxy::new(&config.backend, &config.timeouts)?;

        tracing::info!(backend = %relay.base_url(), "Relay target configured");

        let router = Self::build_router(AppState { relay });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(RELAY_PATH, get(relay_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .set_x_request_id(MakeRequestUuid)
                    .layer(TraceLayer::new_for_http())
                    .propagate_x_request_id(),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay the caller's question to the backend.
async fn relay_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.get(X_REQUEST_ID);
    let question = question_from_query(query.as_deref());

    match state.relay.relay(question.as_deref(), request_id).await {
        Ok(res) => {
            metrics::record_request("relayed", res.status.as_u16(), start_time);
            res.into_response()
        }
        Err(e) => {
            let status = e.status_code();
            tracing::debug!(
                request_id = ?request_id,
                status = %status,
                error = %e,
                "Relay failed"
            );
            metrics::record_request(e.outcome(), status.as_u16(), start_time);
            e.into_response()
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "active",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = RelayConfig::default();
        // Nothing listens here; the tests below never reach the backend.
        config.backend.port = 9;
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn blank_question_is_rejected_with_request_id() {
        let res = server()
            .router()
            .oneshot(
                Request::get("/api/proxy?pregunta=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.headers().contains_key(X_REQUEST_ID));
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], "La pregunta es requerida.".as_bytes());
    }

    #[tokio::test]
    async fn missing_question_is_rejected() {
        let res = server()
            .router()
            .oneshot(Request::get("/api/proxy").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let res = server()
            .router()
            .oneshot(
                Request::get("/api/proxy")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()[X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn health_reports_active() {
        let res = server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["service"], "pregunta-relay");
    }

    #[tokio::test]
    async fn only_get_is_routed() {
        let res = server()
            .router()
            .oneshot(
                Request::post("/api/proxy?pregunta=hola")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
