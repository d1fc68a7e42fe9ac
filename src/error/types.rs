//! Main error type for the Discovery Engine client.

use thiserror::Error;
use super::categories::*;

/// Result type alias for Discovery Engine operations.
pub type DiscoveryEngineResult<T> = Result<T, DiscoveryEngineError>;

/// Top-level error type for the Discovery Engine integration.
///
/// Only failures that stop an operation surface here. Malformed stream
/// objects, unknown reference shapes and out-of-range citation offsets are
/// recovered inside the streaming pipeline and never become errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl DiscoveryEngineError {
    /// Returns true if the failure happened before the upstream accepted the request.
    pub fn is_initiation_failure(&self) -> bool {
        matches!(
            self,
            DiscoveryEngineError::Configuration(_)
                | DiscoveryEngineError::Authentication(_)
                | DiscoveryEngineError::Request(_)
        )
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DiscoveryEngineError::Server(
                ServerError::InternalError { status, .. } | ServerError::UnexpectedStatus { status, .. },
            ) => Some(*status),
            DiscoveryEngineError::Server(ServerError::ServiceUnavailable { .. }) => Some(503),
            DiscoveryEngineError::Server(ServerError::RateLimited { .. }) => Some(429),
            DiscoveryEngineError::Authentication(AuthenticationError::Unauthorized { .. }) => Some(401),
            DiscoveryEngineError::Authentication(AuthenticationError::PermissionDenied { .. }) => Some(403),
            DiscoveryEngineError::Request(RequestError::BadRequest { .. }) => Some(400),
            DiscoveryEngineError::Request(RequestError::NotFound { .. }) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DiscoveryEngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DiscoveryEngineError::Network(NetworkError::Timeout)
        } else {
            DiscoveryEngineError::Network(NetworkError::ConnectionFailed {
                message: err.to_string(),
            })
        }
    }
}

impl From<serde_json::Error> for DiscoveryEngineError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryEngineError::Response(ResponseError::Deserialization {
            message: err.to_string(),
            body: String::new(),
        })
    }
}

impl From<url::ParseError> for DiscoveryEngineError {
    fn from(err: url::ParseError) -> Self {
        DiscoveryEngineError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiation_failures() {
        let auth = DiscoveryEngineError::Authentication(AuthenticationError::TokenUnavailable {
            message: "no gcloud".into(),
        });
        assert!(auth.is_initiation_failure());

        let network = DiscoveryEngineError::Network(NetworkError::Timeout);
        assert!(!network.is_initiation_failure());
    }

    #[test]
    fn test_status_extraction() {
        let err = DiscoveryEngineError::Server(ServerError::InternalError {
            status: 502,
            message: "bad gateway".into(),
        });
        assert_eq!(err.status(), Some(502));

        let err = DiscoveryEngineError::Response(ResponseError::EmptyResponse);
        assert_eq!(err.status(), None);
    }
}
