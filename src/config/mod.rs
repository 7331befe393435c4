//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared with the HTTP server and relay at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend address never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RelayConfig;
pub use schema::ListenerConfig;
pub use schema::BackendConfig;
pub use schema::TimeoutConfig;
pub use schema::ObservabilityConfig;
