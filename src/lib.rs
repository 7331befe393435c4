//! Pregunta relay library.
//!
//! Accepts a question on `GET /api/proxy?pregunta=...`, forwards it to a
//! single configured search backend and streams the backend's answer back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{RelayError, RelayProxy};
