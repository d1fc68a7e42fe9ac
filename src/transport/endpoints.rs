//! Resource paths and endpoint URLs for the Discovery Engine API.

use url::Url;

use crate::config::DiscoveryEngineConfig;
use crate::error::DiscoveryEngineError;

/// Method name of the streaming answer endpoint.
pub const STREAM_ANSWER: &str = "streamAnswer";

/// Method name of the non-streaming answer endpoint.
pub const ANSWER: &str = "answer";

/// Method name of the search endpoint.
pub const SEARCH: &str = "search";

/// Session id placeholder asking the service to start a new session.
pub const NEW_SESSION: &str = "-";

/// Resource name of the configured engine.
///
/// # Example
///
/// ```
/// use integrations_discovery_engine::config::DiscoveryEngineConfig;
/// use integrations_discovery_engine::transport::endpoints;
///
/// let config = DiscoveryEngineConfig::builder()
///     .project_id("p")
///     .location("global")
///     .collection("default_collection")
///     .engine_id("e")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     endpoints::engine_path(&config),
///     "projects/p/locations/global/collections/default_collection/engines/e"
/// );
/// ```
pub fn engine_path(config: &DiscoveryEngineConfig) -> String {
    format!(
        "projects/{}/locations/{}/collections/{}/engines/{}",
        config.project_id, config.location, config.collection, config.engine_id
    )
}

/// Session resource path for a previous session id, or a new session when absent.
pub fn session_path(config: &DiscoveryEngineConfig, session_id: Option<&str>) -> String {
    let id = session_id.filter(|id| !id.is_empty()).unwrap_or(NEW_SESSION);
    format!("{}/sessions/{}", engine_path(config), id)
}

/// Resource name of the configured serving config.
pub fn serving_config_path(config: &DiscoveryEngineConfig) -> String {
    format!("{}/servingConfigs/{}", engine_path(config), config.serving_config)
}

/// Full URL of a serving config method, e.g. `...:streamAnswer`.
pub fn method_url(config: &DiscoveryEngineConfig, method: &str) -> Result<Url, DiscoveryEngineError> {
    let path = format!(
        "{}/{}:{}",
        config.api_version,
        serving_config_path(config),
        method
    );
    Ok(config.base_url.join(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DiscoveryEngineConfig {
        DiscoveryEngineConfig::builder()
            .project_id("proj")
            .location("global")
            .collection("default_collection")
            .engine_id("chem")
            .build()
            .unwrap()
    }

    #[test]
    fn test_session_path() {
        let config = config();
        assert_eq!(
            session_path(&config, Some("123")),
            "projects/proj/locations/global/collections/default_collection/engines/chem/sessions/123"
        );
        assert_eq!(
            session_path(&config, None),
            "projects/proj/locations/global/collections/default_collection/engines/chem/sessions/-"
        );
        assert!(session_path(&config, Some("")).ends_with("/sessions/-"));
    }

    #[test]
    fn test_method_url() {
        let url = method_url(&config(), STREAM_ANSWER).unwrap();
        assert_eq!(
            url.as_str(),
            "https://discoveryengine.googleapis.com/v1alpha/projects/proj/locations/global/collections/default_collection/engines/chem/servingConfigs/default_search:streamAnswer"
        );
    }

    #[test]
    fn test_method_url_with_base_path() {
        let config = DiscoveryEngineConfig::builder()
            .project_id("p")
            .location("eu")
            .collection("c")
            .engine_id("e")
            .base_url("http://127.0.0.1:8080/")
            .unwrap()
            .build()
            .unwrap();

        let url = method_url(&config, SEARCH).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/v1alpha/projects/p/locations/eu/collections/c/engines/e/servingConfigs/default_search:search"
        );
    }
}
