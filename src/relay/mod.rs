//! Query relay subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/proxy?pregunta=...
//!     → query.rs (presence & blank check)
//!     → upstream.rs (fixed backend URL + encoded question)
//!     → proxy.rs (send, wait for headers, classify status)
//!     → resilience::timeouts (idle-guarded body stream)
//!     → ClientResponse streamed back to the caller
//! ```
//!
//! # Design Decisions
//! - One outbound attempt per inbound request; nothing is retried
//! - Backend body is opaque bytes; content type passed through untouched
//! - Backend error bodies never reach the caller

pub mod error;
pub mod proxy;
pub mod query;
pub mod upstream;

pub use error::{RelayError, RelayResult, UnreachableCause};
pub use proxy::{ClientResponse, RelayProxy};
pub use query::Query;
pub use upstream::UpstreamRequest;
