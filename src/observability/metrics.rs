//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relays by outcome and status
//! - `relay_request_duration_seconds` (histogram): time until headers were answered
//! - `relay_streams_total` (counter): body transfers by how they ended
//! - `relay_stream_bytes_total` (counter): bytes copied from backend to callers

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one inbound relay request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "relay_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record the end of one streamed body.
pub fn record_stream(outcome: &'static str, bytes: u64) {
    ::metrics::counter!("relay_streams_total", "outcome" => outcome).increment(1);
    ::metrics::counter!("relay_stream_bytes_total").increment(bytes);
}
