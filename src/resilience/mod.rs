//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → connect timeout (set on the connector)
//!     → timeouts.rs (response headers must arrive in time)
//!     → timeouts.rs (every body chunk must arrive within the idle window)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries and no circuit breaker: one attempt per caller request
//! - A stalled stream is cut, never resumed

pub mod timeouts;
