//! Access token providers for the Discovery Engine API.
//!
//! Every request carries `Authorization: Bearer <token>`. Tokens come from a
//! [`TokenProvider`], which owns its own caching and refresh. The provider is
//! injected into the client; there is no process-wide credential.
//!
//! [`default_provider`] picks a provider the same way for every process:
//! 1. `GOOGLE_ACCESS_TOKEN` set: that token, as is
//! 2. `K_SERVICE` set (Cloud Run): the metadata server
//! 3. otherwise: the `gcloud` CLI

mod gcloud;
mod metadata;

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

use crate::error::AuthenticationError;

pub use gcloud::{parse_cli_token, GcloudCliTokenProvider, GCLOUD_TIMEOUT_SECONDS};
pub use metadata::{
    CachedToken, MetadataServerTokenProvider, METADATA_TOKEN_URL, TOKEN_EXPIRY_BUFFER_SECONDS,
};

/// Environment variable holding an explicit access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// Environment variable set by Cloud Run.
pub const CLOUD_RUN_ENV: &str = "K_SERVICE";

/// Source of bearer tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> Result<SecretString, AuthenticationError>;
}

/// Provider returning a fixed token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Creates a provider for an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }

    /// Reads the token from `GOOGLE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, AuthenticationError> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(AuthenticationError::TokenUnavailable {
                message: format!("{ACCESS_TOKEN_ENV} is not set"),
            }),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"***REDACTED***")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<SecretString, AuthenticationError> {
        Ok(self.token.clone())
    }
}

/// Where [`default_provider`] gets its tokens from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// An explicit token from `GOOGLE_ACCESS_TOKEN`.
    EnvironmentToken(String),
    /// The GCE / Cloud Run metadata server.
    MetadataServer,
    /// `gcloud auth print-access-token`.
    GcloudCli,
}

impl CredentialSource {
    /// Detects the credential source from the process environment.
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    /// Detects the credential source from an arbitrary variable lookup.
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            return Self::EnvironmentToken(token.trim().to_string());
        }
        if lookup(CLOUD_RUN_ENV).is_some() {
            return Self::MetadataServer;
        }
        Self::GcloudCli
    }

    /// Builds the provider for this source.
    pub fn into_provider(self) -> Arc<dyn TokenProvider> {
        match self {
            Self::EnvironmentToken(token) => Arc::new(StaticTokenProvider::new(token)),
            Self::MetadataServer => Arc::new(MetadataServerTokenProvider::new()),
            Self::GcloudCli => Arc::new(GcloudCliTokenProvider::new()),
        }
    }
}

/// Returns the token provider for the current environment.
pub fn default_provider() -> Arc<dyn TokenProvider> {
    let source = CredentialSource::detect();
    tracing::debug!(
        source = match &source {
            CredentialSource::EnvironmentToken(_) => "environment",
            CredentialSource::MetadataServer => "metadata_server",
            CredentialSource::GcloudCli => "gcloud",
        },
        "Selected access token source"
    );
    source.into_provider()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("ya29.abc");
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "ya29.abc");
        assert!(!format!("{provider:?}").contains("ya29"));
    }

    #[test]
    fn test_detect_prefers_explicit_token() {
        let source = CredentialSource::detect_with(lookup(&[
            (ACCESS_TOKEN_ENV, " ya29.env \n"),
            (CLOUD_RUN_ENV, "answer-relay"),
        ]));
        assert_eq!(source, CredentialSource::EnvironmentToken("ya29.env".into()));
    }

    #[test]
    fn test_detect_cloud_run_then_gcloud() {
        assert_eq!(
            CredentialSource::detect_with(lookup(&[(CLOUD_RUN_ENV, "svc")])),
            CredentialSource::MetadataServer
        );
        assert_eq!(
            CredentialSource::detect_with(lookup(&[(ACCESS_TOKEN_ENV, "  ")])),
            CredentialSource::GcloudCli
        );
    }
}
