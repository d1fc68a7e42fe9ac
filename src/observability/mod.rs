//! Observability for the Discovery Engine client.
//!
//! Services log through the [`Logger`] trait so callers can route or silence
//! client logs independently of their own `tracing` subscriber.
//!
//! ```rust
//! use integrations_discovery_engine::observability::{Logger, StructuredLogger};
//! use integrations_discovery_engine::config::LogLevel;
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("discovery_engine.answer")
//!     .with_level(LogLevel::Debug);
//!
//! logger.info("Starting answer stream", json!({
//!     "engine": "chem-engine",
//!     "access_token": "redacted before it is emitted"
//! }));
//! ```

pub mod logging;

pub use logging::{Logger, NoopLogger, StructuredLogger};
