//! Tokens from the GCE / Cloud Run metadata server.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::TokenProvider;
use crate::error::AuthenticationError;

/// Default service account token endpoint of the metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh tokens this many seconds before they expire.
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;

/// Access token with its expiry.
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The token.
    pub token: SecretString,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Creates a token expiring `expires_in` seconds from now.
    pub fn new(token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            token: SecretString::new(token.into()),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    /// Whether the token is within the refresh buffer of its expiry.
    pub fn needs_refresh(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::seconds(TOKEN_EXPIRY_BUFFER_SECONDS)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Provider fetching service account tokens from the metadata server.
///
/// Tokens are cached behind an `RwLock` and refreshed five minutes before
/// expiry. Cloning shares the cache.
#[derive(Clone)]
pub struct MetadataServerTokenProvider {
    token_url: String,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    http_client: Client,
}

impl MetadataServerTokenProvider {
    /// Creates a provider for the default metadata server.
    pub fn new() -> Self {
        Self {
            token_url: METADATA_TOKEN_URL.to_string(),
            cached_token: Arc::new(RwLock::new(None)),
            http_client: Client::new(),
        }
    }

    /// Sets a custom token URL.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    async fn fetch_token(&self) -> Result<CachedToken, AuthenticationError> {
        let response = self
            .http_client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AuthenticationError::RefreshFailed {
                message: format!("Metadata server request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthenticationError::RefreshFailed {
                message: format!("Metadata server returned {status}: {text}"),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            AuthenticationError::RefreshFailed {
                message: format!("Failed to parse metadata token response: {e}"),
            }
        })?;

        if body.access_token.is_empty() {
            return Err(AuthenticationError::RefreshFailed {
                message: "Metadata server returned an empty token".to_string(),
            });
        }

        tracing::debug!(expires_in = body.expires_in, "Fetched access token from metadata server");
        Ok(CachedToken::new(body.access_token, body.expires_in))
    }
}

impl Default for MetadataServerTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for MetadataServerTokenProvider {
    async fn access_token(&self) -> Result<SecretString, AuthenticationError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| !t.needs_refresh()) {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached_token.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(token) = cached.as_ref().filter(|t| !t.needs_refresh()) {
            return Ok(token.token.clone());
        }

        let token = self.fetch_token().await?;
        let secret = token.token.clone();
        *cached = Some(token);
        Ok(secret)
    }
}
