//! Decoding of the `streamAnswer` response protocol.
//!
//! The pipeline, leaf first:
//! - `ObjectTokenizer` cuts the raw byte stream into complete JSON objects
//! - `AnswerDeltaEngine` turns cumulative answer states into text deltas
//!   and keeps the latest session, related questions, references and citations
//! - `extract_references` normalizes the two reference record shapes
//! - `inject_citations` adds `[n]` markers to the finished answer
//!
//! `AnswerStream` wires these together over a response body:
//!
//! ```rust,no_run
//! use integrations_discovery_engine::streaming::AnswerStream;
//! use integrations_discovery_engine::StreamChunk;
//! use futures::StreamExt;
//!
//! async fn print_answer(mut stream: AnswerStream) {
//!     while let Some(Ok(chunk)) = stream.next().await {
//!         match chunk {
//!             StreamChunk::Content { text, replace } => {
//!                 tracing::info!(%text, replace, "content");
//!             }
//!             StreamChunk::Metadata { session_id, .. } => {
//!                 tracing::info!(?session_id, "metadata");
//!             }
//!             StreamChunk::Done => break,
//!         }
//!     }
//! }
//! ```

mod answer_stream;
mod citations;
mod delta;
mod references;
mod tokenizer;

pub use answer_stream::{AnswerStream, ByteStream};
pub use citations::{has_citation_markers, inject_citations};
pub use delta::{extract_session_id, AnswerDeltaEngine};
pub use references::{extract_reference, extract_references, page_number};
pub use tokenizer::ObjectTokenizer;
