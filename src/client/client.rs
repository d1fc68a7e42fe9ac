//! Main client implementation for the Discovery Engine answer API.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::config::DiscoveryEngineConfig;
use crate::error::DiscoveryEngineResult;
use crate::observability::Logger;
use crate::services::{AnswerService, AnswerServiceImpl};
use crate::streaming::AnswerStream;
use crate::transport::HttpTransport;
use crate::types::{AnswerQuery, AnswerResponse};

use super::builder::DiscoveryEngineClientBuilder;

/// Client for one Discovery Engine serving config.
///
/// The answer service is built on first use and shared afterwards. The
/// client is `Send + Sync` and can be shared behind an `Arc`; every call
/// is independent.
///
/// ```no_run
/// use integrations_discovery_engine::{DiscoveryEngineClient, AnswerQuery, StreamChunk};
/// use futures::StreamExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DiscoveryEngineClient::from_env()?;
/// let mut stream = client
///     .stream_answer(AnswerQuery::new("What is the boiling point of ethanol?"))
///     .await?;
///
/// while let Some(chunk) = stream.next().await {
///     if let StreamChunk::Content { text, .. } = chunk? {
///         tracing::info!(%text);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct DiscoveryEngineClient {
    config: Arc<DiscoveryEngineConfig>,
    transport: Arc<dyn HttpTransport>,
    token_provider: Arc<dyn TokenProvider>,
    logger: Arc<dyn Logger>,

    answer_service: OnceCell<AnswerServiceImpl>,
}

impl DiscoveryEngineClient {
    /// Creates a new client builder.
    pub fn builder() -> DiscoveryEngineClientBuilder {
        DiscoveryEngineClientBuilder::new()
    }

    /// Creates a client from `VERTEX_AI_*` environment variables, with the
    /// token provider picked from the environment.
    pub fn from_env() -> DiscoveryEngineResult<Self> {
        Self::new(DiscoveryEngineConfig::from_env()?)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: DiscoveryEngineConfig) -> DiscoveryEngineResult<Self> {
        DiscoveryEngineClientBuilder::from_config(config).build()
    }

    pub(super) fn from_parts(
        config: DiscoveryEngineConfig,
        transport: Arc<dyn HttpTransport>,
        token_provider: Arc<dyn TokenProvider>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            token_provider,
            logger,
            answer_service: OnceCell::new(),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &DiscoveryEngineConfig {
        &self.config
    }

    /// Returns the answer service.
    pub fn answers(&self) -> &dyn AnswerService {
        self.answer_service.get_or_init(|| {
            AnswerServiceImpl::new(
                self.config.clone(),
                self.transport.clone(),
                self.token_provider.clone(),
                self.logger.clone(),
            )
        })
    }

    /// Starts a streamed answer. See [`AnswerService::stream_answer`].
    pub async fn stream_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerStream> {
        self.answers().stream_answer(query).await
    }

    /// Answers with a single non-streaming call. See [`AnswerService::answer`].
    pub async fn answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse> {
        self.answers().answer(query).await
    }

    /// Searches, then answers. See [`AnswerService::search_and_answer`].
    pub async fn search_and_answer(&self, query: AnswerQuery) -> DiscoveryEngineResult<AnswerResponse> {
        self.answers().search_and_answer(query).await
    }
}

impl std::fmt::Debug for DiscoveryEngineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryEngineClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Creates a client from a configuration.
pub fn create_client(config: DiscoveryEngineConfig) -> DiscoveryEngineResult<DiscoveryEngineClient> {
    DiscoveryEngineClient::new(config)
}

/// Creates a client from environment variables.
pub fn create_client_from_env() -> DiscoveryEngineResult<DiscoveryEngineClient> {
    DiscoveryEngineClient::from_env()
}
