//! Builder for creating Discovery Engine client instances.

use std::sync::Arc;

use crate::auth::{self, TokenProvider};
use crate::config::DiscoveryEngineConfig;
use crate::error::{ConfigurationError, DiscoveryEngineError};
use crate::observability::{Logger, StructuredLogger};
use crate::transport::{HttpTransport, ReqwestTransport};

use super::client::DiscoveryEngineClient;

/// Builder for a `DiscoveryEngineClient`.
///
/// Transport, token provider and logger default to `ReqwestTransport`,
/// [`auth::default_provider`] and a `StructuredLogger`; each can be
/// replaced, which is how tests inject mocks.
///
/// # Example
///
/// ```no_run
/// use integrations_discovery_engine::{DiscoveryEngineClientBuilder, DiscoveryEngineConfig};
/// use integrations_discovery_engine::auth::StaticTokenProvider;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DiscoveryEngineConfig::builder()
///     .project_id("my-project")
///     .location("global")
///     .collection("default_collection")
///     .engine_id("chem-engine")
///     .build()?;
///
/// let client = DiscoveryEngineClientBuilder::new()
///     .config(config)
///     .token_provider(Arc::new(StaticTokenProvider::new("ya29...")))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DiscoveryEngineClientBuilder {
    config: Option<DiscoveryEngineConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    logger: Option<Arc<dyn Logger>>,
}

impl DiscoveryEngineClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: DiscoveryEngineConfig) -> Self {
        Self::new().config(config)
    }

    /// Sets the configuration.
    pub fn config(mut self, config: DiscoveryEngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the access token provider.
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<DiscoveryEngineClient, DiscoveryEngineError> {
        let config = self.config.ok_or_else(|| {
            DiscoveryEngineError::Configuration(ConfigurationError::MissingField {
                field: "config".to_string(),
            })
        })?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(config.timeout, config.connect_timeout).map_err(|e| {
                    DiscoveryEngineError::Configuration(ConfigurationError::InvalidConfiguration {
                        message: e.to_string(),
                    })
                })?,
            ),
        };

        let token_provider = self.token_provider.unwrap_or_else(auth::default_provider);

        let logger = self.logger.unwrap_or_else(|| {
            Arc::new(StructuredLogger::new("discovery_engine").with_level(config.log_level))
        });

        Ok(DiscoveryEngineClient::from_parts(config, transport, token_provider, logger))
    }
}
