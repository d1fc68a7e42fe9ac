//! Configuration types for the Discovery Engine client.

use std::time::Duration;
use url::Url;
use crate::error::{ConfigurationError, DiscoveryEngineError};

/// Default Discovery Engine API base URL.
pub const DEFAULT_BASE_URL: &str = "https://discoveryengine.googleapis.com";

/// Default API version. `streamAnswer` is only exposed on the alpha surface.
pub const DEFAULT_API_VERSION: &str = "v1alpha";

/// Default serving config name.
pub const DEFAULT_SERVING_CONFIG: &str = "default_search";

/// Default request timeout (120 seconds), covering the whole streamed answer.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default language code for search requests.
pub const DEFAULT_LANGUAGE_CODE: &str = "en-GB";

/// Default number of search results requested by `search_and_answer`.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

impl LogLevel {
    pub(crate) fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
            LogLevel::Trace => 4,
        }
    }
}

/// Configuration for the Discovery Engine client.
///
/// Identifies one engine (`project/location/collection/engine`) and the
/// serving config whose `streamAnswer`, `answer` and `search` methods are called.
#[derive(Clone, Debug)]
pub struct DiscoveryEngineConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Location of the engine (e.g. `global`, `eu`).
    pub location: String,
    /// Data store collection (usually `default_collection`).
    pub collection: String,
    /// Engine (app) id.
    pub engine_id: String,
    /// Serving config name.
    pub serving_config: String,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version.
    pub api_version: String,
    /// Timeout for a whole request, streamed body included.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Language code sent with search requests.
    pub language_code: String,
    /// Page size sent with search requests.
    pub search_page_size: u32,
    /// Log level.
    pub log_level: LogLevel,
}

impl DiscoveryEngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DiscoveryEngineConfigBuilder {
        DiscoveryEngineConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `VERTEX_AI_PROJECT_ID`, `VERTEX_AI_LOCATION`, `VERTEX_AI_COLLECTION`
    /// and `VERTEX_AI_ENGINE_ID` (required), plus the optional
    /// `VERTEX_AI_BASE_URL`, `VERTEX_AI_API_VERSION` and `VERTEX_AI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DiscoveryEngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DiscoveryEngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigurationError::MissingField { field: key.to_string() })
        };

        let mut builder = Self::builder()
            .project_id(required("VERTEX_AI_PROJECT_ID")?)
            .location(required("VERTEX_AI_LOCATION")?)
            .collection(required("VERTEX_AI_COLLECTION")?)
            .engine_id(required("VERTEX_AI_ENGINE_ID")?);

        if let Some(base_url) = lookup("VERTEX_AI_BASE_URL") {
            builder = builder.base_url(&base_url)?;
        }

        if let Some(version) = lookup("VERTEX_AI_API_VERSION") {
            builder = builder.api_version(&version);
        }

        if let Some(secs) = lookup("VERTEX_AI_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Builder for `DiscoveryEngineConfig`.
#[derive(Default)]
pub struct DiscoveryEngineConfigBuilder {
    project_id: Option<String>,
    location: Option<String>,
    collection: Option<String>,
    engine_id: Option<String>,
    serving_config: Option<String>,
    base_url: Option<Url>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    language_code: Option<String>,
    search_page_size: Option<u32>,
    log_level: Option<LogLevel>,
}

impl DiscoveryEngineConfigBuilder {
    /// Set the project id.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the engine location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the collection.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the engine id.
    pub fn engine_id(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = Some(engine_id.into());
        self
    }

    /// Set the serving config name.
    pub fn serving_config(mut self, serving_config: impl Into<String>) -> Self {
        self.serving_config = Some(serving_config.into());
        self
    }

    /// Set the base URL. A path prefix is kept when endpoint paths are joined.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, DiscoveryEngineError> {
        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(ConfigurationError::InvalidBaseUrl { url: base_url.to_string() }.into());
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the search language code.
    pub fn language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = Some(code.into());
        self
    }

    /// Set the search page size.
    pub fn search_page_size(mut self, size: u32) -> Self {
        self.search_page_size = Some(size);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DiscoveryEngineConfig, DiscoveryEngineError> {
        fn require(value: Option<String>, field: &str) -> Result<String, ConfigurationError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigurationError::MissingField { field: field.to_string() })
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        if let Some(0) = self.search_page_size {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "search_page_size must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(DiscoveryEngineConfig {
            project_id: require(self.project_id, "project_id")?,
            location: require(self.location, "location")?,
            collection: require(self.collection, "collection")?,
            engine_id: require(self.engine_id, "engine_id")?,
            serving_config: self.serving_config.unwrap_or_else(|| DEFAULT_SERVING_CONFIG.to_string()),
            base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            language_code: self.language_code.unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
            search_page_size: self.search_page_size.unwrap_or(DEFAULT_SEARCH_PAGE_SIZE),
            log_level: self.log_level.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn minimal() -> DiscoveryEngineConfigBuilder {
        DiscoveryEngineConfig::builder()
            .project_id("my-project")
            .location("global")
            .collection("default_collection")
            .engine_id("molecules-engine")
    }

    #[test]
    fn test_default_config() {
        let config = minimal().build().unwrap();

        assert_eq!(config.base_url.as_str(), "https://discoveryengine.googleapis.com/");
        assert_eq!(config.api_version, "v1alpha");
        assert_eq!(config.serving_config, "default_search");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.language_code, "en-GB");
        assert_eq!(config.search_page_size, 10);
    }

    #[test]
    fn test_missing_engine_id() {
        let result = DiscoveryEngineConfig::builder()
            .project_id("p")
            .location("global")
            .collection("c")
            .build();

        assert!(matches!(
            result,
            Err(DiscoveryEngineError::Configuration(ConfigurationError::MissingField { ref field }))
                if field == "engine_id"
        ));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = minimal().base_url("http://localhost:9090/proxy").unwrap().build().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:9090/proxy/");
        assert!(minimal().base_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = minimal().search_page_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("VERTEX_AI_PROJECT_ID", "proj"),
            ("VERTEX_AI_LOCATION", "eu"),
            ("VERTEX_AI_COLLECTION", "default_collection"),
            ("VERTEX_AI_ENGINE_ID", "engine-1"),
            ("VERTEX_AI_TIMEOUT_SECS", "45"),
        ]);

        let config = DiscoveryEngineConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();

        assert_eq!(config.project_id, "proj");
        assert_eq!(config.location, "eu");
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_from_lookup_missing_project() {
        let result = DiscoveryEngineConfig::from_lookup(|_| None);
        assert!(matches!(
            result,
            Err(DiscoveryEngineError::Configuration(ConfigurationError::MissingField { ref field }))
                if field == "VERTEX_AI_PROJECT_ID"
        ));
    }
}
