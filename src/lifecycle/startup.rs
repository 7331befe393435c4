//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the relay and its HTTP server
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::RelayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid backend address: {0}")]
    Backend(#[from] url::ParseError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] std::net::AddrParseError),
}

/// A server accepting traffic in a background task.
#[derive(Debug)]
pub struct Running {
    /// Address the listener actually bound to.
    pub local_addr: SocketAddr,
    /// Resolves when the server has drained after shutdown.
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Running {
    /// Wait for `stop` and then for the server to drain.
    ///
    /// Returns early with the server's error if it exits before `stop`.
    pub async fn wait_until<F>(mut self, stop: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = stop => self.handle.await.map_err(std::io::Error::other)?,
            result = &mut self.handle => {
                tracing::error!("HTTP server exited before a shutdown signal");
                result.map_err(std::io::Error::other)?
            }
        }
    }
}

/// Start serving `config` until `shutdown` fires.
pub async fn launch(config: RelayConfig, shutdown: &Shutdown) -> Result<Running, StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: bind_address,
        source,
    })?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    Ok(Running { local_addr, handle })
}
