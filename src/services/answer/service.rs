//! Answer service implementation over an injected transport and token provider.

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::text::{clean_answer_text, NO_ANSWER_FALLBACK};
use super::AnswerService;
use crate::auth::TokenProvider;
use crate::config::DiscoveryEngineConfig;
use crate::error::{DiscoveryEngineError, DiscoveryEngineResult, RequestError};
use crate::observability::Logger;
use crate::streaming::{extract_references, extract_session_id, inject_citations, AnswerStream, ByteStream};
use crate::transport::{endpoints, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{AnswerEvent, AnswerQuery, AnswerRequest, AnswerResponse, SearchRequest, SearchResponse};

/// Implementation of the `AnswerService`.
pub struct AnswerServiceImpl {
    config: Arc<DiscoveryEngineConfig>,
    transport: Arc<dyn HttpTransport>,
    token_provider: Arc<dyn TokenProvider>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
}

impl AnswerServiceImpl {
    /// Create a new answer service implementation.
    pub fn new(
        config: Arc<DiscoveryEngineConfig>,
        transport: Arc<dyn HttpTransport>,
        token_provider: Arc<dyn TokenProvider>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let request_builder = RequestBuilder::new(config.clone());
        Self {
            config,
            transport,
            token_provider,
            request_builder,
            logger,
        }
    }

    fn validate(query: &AnswerQuery) -> DiscoveryEngineResult<()> {
        if query.text.trim().is_empty() {
            return Err(DiscoveryEngineError::Request(RequestError::InvalidQuery {
                message: "Query text must not be empty".to_string(),
            }));
        }
        Ok(())
    }

    /// Posts `body` to a serving config method and decodes the JSON reply.
    async fn call<B, T>(&self, method: &str, body: &B) -> DiscoveryEngineResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let token = self.token_provider.access_token().await?;
        let request = self.request_builder.build_request(method, body, &token)?;
        let started = Instant::now();

        let response = self.transport.send(request).await.map_err(|e| {
            let error = DiscoveryEngineError::from(e);
            self.logger.error("Discovery Engine request failed", json!({
                "method": method,
                "error": error.to_string(),
            }));
            error
        })?;

        self.logger.debug("Discovery Engine request completed", json!({
            "method": method,
            "status": response.status,
            "duration_ms": started.elapsed().as_millis() as u64,
        }));

        ResponseParser::parse_response(response).map_err(|error| {
            self.logger.warn("Discovery Engine request rejected", json!({
                "method": method,
                "error": error.to_string(),
            }));
            error
        })
    }

    fn session_path(&self, session_id: Option<&str>) -> String {
        endpoints::session_path(&self.config, session_id)
    }
}

/// Builds the caller-facing response from a unary `answer` reply.
fn build_response(
    event: AnswerEvent,
    summary: Option<&str>,
    fallback_session: Option<String>,
    query_id: Option<String>,
) -> AnswerResponse {
    let session_id = event
        .session
        .and_then(|s| s.name)
        .and_then(|name| extract_session_id(&name))
        .or(fallback_session);

    let payload = event.answer.unwrap_or_default();
    let text = payload
        .answer_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(summary.filter(|s| !s.is_empty()))
        .unwrap_or(NO_ANSWER_FALLBACK);

    let references = extract_references(payload.references.as_deref().unwrap_or_default());
    let answer = inject_citations(clean_answer_text(text), payload.citations.as_deref(), &references);

    AnswerResponse {
        answer,
        session_id,
        query_id,
        related_questions: payload.related_questions.unwrap_or_default(),
        references,
    }
}

#[async_trait]
impl AnswerService for AnswerServiceImpl {
    async fn stream_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerStream> {
        Self::validate(&query)?;

        self.logger.info("Starting answer stream", json!({
            "engine": self.config.engine_id,
            "has_session": query.session().is_some(),
            "has_context": query.context.is_some(),
        }));

        let token = self.token_provider.access_token().await.map_err(|e| {
            self.logger.error("Failed to obtain access token", json!({ "error": e.to_string() }));
            DiscoveryEngineError::from(e)
        })?;

        let body = AnswerRequest::new(query.final_text(), self.session_path(query.session()));
        let request = self.request_builder.build_request(endpoints::STREAM_ANSWER, &body, &token)?;

        let chunks = self.transport.send_streaming(request).await.map_err(|e| {
            let error = DiscoveryEngineError::from(e);
            self.logger.error("Answer stream could not be started", json!({
                "engine": self.config.engine_id,
                "error": error.to_string(),
            }));
            error
        })?;

        let body: ByteStream = Box::pin(chunks.map(|chunk| chunk.map_err(DiscoveryEngineError::from)));
        Ok(AnswerStream::new(body))
    }

    async fn answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse> {
        Self::validate(&query)?;

        let body = AnswerRequest::new(query.final_text(), self.session_path(query.session()));
        let event: AnswerEvent = self.call(endpoints::ANSWER, &body).await?;

        let response = build_response(event, None, query.session().map(str::to_string), None);
        self.logger.info("Answer completed", json!({
            "answer_len": response.answer.len(),
            "references": response.references.len(),
        }));
        Ok(response)
    }

    async fn search_and_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse> {
        Self::validate(&query)?;
        let text = query.final_text();

        let search = SearchRequest::new(
            text.clone(),
            self.session_path(query.session()),
            self.config.search_page_size,
            self.config.language_code.clone(),
        );
        let searched: SearchResponse = self.call(endpoints::SEARCH, &search).await?;

        let search_session = searched
            .session
            .and_then(|s| s.name)
            .and_then(|name| extract_session_id(&name));
        let summary = searched.summary.and_then(|s| s.summary_text);

        self.logger.debug("Search completed", json!({
            "has_session": search_session.is_some(),
            "has_query_id": searched.query_id.is_some(),
            "has_summary": summary.is_some(),
        }));

        let body = AnswerRequest::new(text, self.session_path(search_session.as_deref()))
            .with_query_id(searched.query_id.clone());
        let event: AnswerEvent = self.call(endpoints::ANSWER, &body).await?;

        let response = build_response(event, summary.as_deref(), search_session, searched.query_id);
        self.logger.info("Search and answer completed", json!({
            "answer_len": response.answer.len(),
            "references": response.references.len(),
        }));
        Ok(response)
    }
}
