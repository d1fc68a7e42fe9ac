//! Transport layer error types.

use crate::error::{map_http_status, DiscoveryEngineError, NetworkError};

/// Transport error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout")]
    Timeout,
    #[error("Request error: {0}")]
    Request(String),
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<TransportError> for DiscoveryEngineError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) => {
                DiscoveryEngineError::Network(NetworkError::ConnectionFailed { message })
            }
            TransportError::Timeout => DiscoveryEngineError::Network(NetworkError::Timeout),
            TransportError::Request(message) => {
                DiscoveryEngineError::Network(NetworkError::StreamInterrupted { message })
            }
            TransportError::Status { status, body } => map_http_status(status, body.as_bytes()),
        }
    }
}
