//! # Discovery Engine Answer Client
//!
//! Streaming answer client for the Vertex AI Search (Discovery Engine)
//! answer API.
//!
//! ## Features
//!
//! - `streamAnswer` decoding into incremental `Content` events, with
//!   corrective replacements when the service rewrites its answer
//! - Reference normalization and `[n]` citation markers on the final answer
//! - Non-streaming `answer` and `search` + `answer` flows
//! - Pluggable access token providers (static, metadata server, gcloud CLI)
//! - Structured logging with credential redaction
//! - Mock transport and token provider for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_discovery_engine::{create_client, AnswerQuery, DiscoveryEngineConfig, StreamChunk};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DiscoveryEngineConfig::builder()
//!         .project_id("my-project")
//!         .location("global")
//!         .collection("default_collection")
//!         .engine_id("chem-engine")
//!         .build()?;
//!
//!     let client = create_client(config)?;
//!
//!     let mut stream = client
//!         .stream_answer(AnswerQuery::new("Is caffeine soluble in water?"))
//!         .await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         match chunk? {
//!             StreamChunk::Content { text, replace } => tracing::info!(%text, replace),
//!             StreamChunk::Metadata { session_id, .. } => tracing::info!(?session_id),
//!             StreamChunk::Done => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Client, builder and factory functions
//! - `config` - Configuration types and builder
//! - `auth` - Access token providers
//! - `transport` - HTTP transport layer and endpoint paths
//! - `error` - Error types and taxonomy
//! - `types` - Wire and caller-facing types
//! - `streaming` - Tokenizer, delta engine, references and citations
//! - `services` - Answer service
//! - `observability` - Structured logging

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod services;
pub mod streaming;
pub mod transport;
pub mod types;

// Always available for integration tests.
pub mod mocks;

pub use auth::{
    default_provider, GcloudCliTokenProvider, MetadataServerTokenProvider, StaticTokenProvider,
    TokenProvider,
};
pub use client::{create_client, create_client_from_env, DiscoveryEngineClient, DiscoveryEngineClientBuilder};
pub use config::{
    DiscoveryEngineConfig, DiscoveryEngineConfigBuilder, LogLevel, DEFAULT_API_VERSION,
    DEFAULT_BASE_URL, DEFAULT_SERVING_CONFIG,
};
pub use error::{DiscoveryEngineError, DiscoveryEngineResult};
pub use services::{AnswerService, AnswerServiceImpl};
pub use streaming::{AnswerDeltaEngine, AnswerStream, ObjectTokenizer};
pub use types::{AnswerQuery, AnswerResponse, Citation, Reference, StreamChunk};
