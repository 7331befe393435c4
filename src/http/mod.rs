//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace spans)
//!     → request.rs (query-string extraction)
//!     → [relay forwards to the backend]
//!     → response.rs (stream success, translate errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{question_from_query, X_REQUEST_ID};
pub use server::{HttpServer, RELAY_PATH};
