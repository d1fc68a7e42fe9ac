//! Answer service for the Discovery Engine API.

mod service;
mod text;

use async_trait::async_trait;

use crate::error::DiscoveryEngineResult;
use crate::streaming::AnswerStream;
use crate::types::{AnswerQuery, AnswerResponse};

pub use service::AnswerServiceImpl;
pub use text::{clean_answer_text, NO_ANSWER_FALLBACK};

/// Question answering over a Discovery Engine serving config.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Starts a streamed answer.
    ///
    /// Fails before returning a stream when the query is empty, no token can
    /// be obtained, or the service rejects the call. Once a stream is
    /// returned, failures surface as a single `Err` item.
    async fn stream_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerStream>;

    /// Answers a question with one non-streaming `answer` call.
    async fn answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse>;

    /// Runs a search, then answers using the search's query id and session.
    async fn search_and_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse>;
}
