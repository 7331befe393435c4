//! Pregunta relay (v1)
//!
//! A streaming question relay built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 PREGUNTA RELAY                 │
//!                        │                                                │
//!   GET /api/proxy       │  ┌─────────┐    ┌─────────┐    ┌───────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│  relay  │───▶│  hyper    │──┼──▶ Backend
//!                        │  │ server  │    │  query  │    │  client   │  │    GET /buscar/
//!                        │  └─────────┘    └─────────┘    └─────┬─────┘  │
//!                        │                                      │        │
//!   streamed body        │  ┌─────────┐    ┌─────────────┐      │        │
//!   ◀────────────────────┼──│response │◀───│ idle-guarded│◀─────┘        │
//!                        │  │         │    │ body stream │               │
//!                        │  └─────────┘    └─────────────┘               │
//!                        │                                                │
//!                        │  config · observability · resilience · lifecycle│
//!                        └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pregunta_relay::config::loader::load_config;
use pregunta_relay::lifecycle::{self, signals, Shutdown};
use pregunta_relay::observability::logging;
use pregunta_relay::RelayConfig;

#[derive(Parser)]
#[command(name = "pregunta-relay")]
#[command(about = "Streams questions to the search backend and answers back", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!("pregunta-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_host = %config.backend.host,
        backend_port = config.backend.port,
        response_timeout_secs = config.timeouts.response_secs,
        idle_timeout_secs = config.timeouts.idle_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let running = lifecycle::launch(config, &shutdown).await?;

    running.wait_until(signals::forward_to(&shutdown)).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
