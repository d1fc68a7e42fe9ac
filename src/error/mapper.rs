//! Error mapping utilities for HTTP status codes and API error bodies.

use serde::Deserialize;
use super::categories::*;
use super::types::DiscoveryEngineError;

/// Structured error response returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detailed error information from the API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Extracts the human readable message from an error body.
///
/// Falls back to the raw body text when it is not a Google API error object.
pub fn extract_error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}

/// Maps a non-success HTTP status and its body to a `DiscoveryEngineError`.
pub fn map_http_status(status: u16, body: &[u8]) -> DiscoveryEngineError {
    let message = extract_error_message(body);

    match status {
        400 => DiscoveryEngineError::Request(RequestError::BadRequest { message }),
        401 => DiscoveryEngineError::Authentication(AuthenticationError::Unauthorized { message }),
        403 => DiscoveryEngineError::Authentication(AuthenticationError::PermissionDenied { message }),
        404 => DiscoveryEngineError::Request(RequestError::NotFound { message }),
        429 => DiscoveryEngineError::Server(ServerError::RateLimited { message }),
        503 => DiscoveryEngineError::Server(ServerError::ServiceUnavailable { message }),
        500..=599 => DiscoveryEngineError::Server(ServerError::InternalError { status, message }),
        _ => DiscoveryEngineError::Server(ServerError::UnexpectedStatus { status, message }),
    }
}
