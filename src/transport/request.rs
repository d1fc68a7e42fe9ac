//! HTTP request builder for the Discovery Engine API.

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::config::DiscoveryEngineConfig;
use crate::error::{DiscoveryEngineError, RequestError};
use super::endpoints;
use super::http::{HttpMethod, HttpRequest};

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Builder for requests against the configured serving config.
///
/// Every request is a JSON `POST` carrying `Authorization: Bearer <token>`
/// and `Content-Type: application/json`.
#[derive(Clone)]
pub struct RequestBuilder {
    config: Arc<DiscoveryEngineConfig>,
}

impl RequestBuilder {
    /// Creates a request builder for the given configuration.
    pub fn new(config: Arc<DiscoveryEngineConfig>) -> Self {
        Self { config }
    }

    /// URL of a serving config method such as `streamAnswer`.
    pub fn build_url(&self, method: &str) -> Result<Url, DiscoveryEngineError> {
        endpoints::method_url(&self.config, method)
    }

    /// Builds an authenticated JSON request for a serving config method.
    pub fn build_request<T: Serialize>(
        &self,
        method: &str,
        body: &T,
        token: &SecretString,
    ) -> Result<HttpRequest, DiscoveryEngineError> {
        let url = self.build_url(method)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("Bearer {}", token.expose_secret()),
        );

        let body = serde_json::to_vec(body).map_err(|e| RequestError::Serialization {
            message: e.to_string(),
        })?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers,
            body: Some(Bytes::from(body)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> RequestBuilder {
        let config = DiscoveryEngineConfig::builder()
            .project_id("proj")
            .location("global")
            .collection("default_collection")
            .engine_id("engine")
            .build()
            .unwrap();
        RequestBuilder::new(Arc::new(config))
    }

    #[test]
    fn test_build_request_headers_and_body() {
        let token = SecretString::new("ya29.token".into());
        let request = builder()
            .build_request(endpoints::ANSWER, &json!({"query": {"text": "hi"}}), &token)
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("/servingConfigs/default_search:answer"));
        assert_eq!(request.headers.get("Authorization").unwrap(), "Bearer ya29.token");
        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");

        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["query"]["text"], "hi");
    }
}
