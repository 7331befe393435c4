//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and HTTP layers produce:
//!     → logging.rs (structured log events, request ID fields)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log lines
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a relay
//! - Metrics are cheap no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
