//! HTTP response parser for the Discovery Engine API.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{map_http_status, DiscoveryEngineError, ResponseError};
use super::http::HttpResponse;

/// Parser for unary responses from the Discovery Engine API.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a successful response body, or maps an error status.
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, DiscoveryEngineError> {
        if !(200..300).contains(&response.status) {
            return Err(Self::parse_error_response(&response));
        }

        if response.body.is_empty() {
            return Err(DiscoveryEngineError::Response(ResponseError::EmptyResponse));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            DiscoveryEngineError::Response(ResponseError::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&response.body).chars().take(512).collect(),
            })
        })
    }

    /// Maps an error response to a `DiscoveryEngineError`.
    pub fn parse_error_response(response: &HttpResponse) -> DiscoveryEngineError {
        let error = map_http_status(response.status, &response.body);

        if let Some(id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(request_id = %id, status = response.status, error = %error, "API error occurred");
        }

        error
    }

    /// Extracts the request id from response headers, if any.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        const REQUEST_ID_HEADERS: [&str; 2] = ["x-goog-request-id", "x-request-id"];

        headers
            .iter()
            .find(|(key, _)| REQUEST_ID_HEADERS.iter().any(|h| key.eq_ignore_ascii_case(h)))
            .map(|(_, value)| value.clone())
    }
}
