//! Tokens from the `gcloud` CLI, for local development.

use async_trait::async_trait;
use secrecy::SecretString;
use std::time::Duration;
use tokio::process::Command;

use super::TokenProvider;
use crate::error::AuthenticationError;

/// How long `gcloud auth print-access-token` may run.
pub const GCLOUD_TIMEOUT_SECONDS: u64 = 10;

/// Provider running `gcloud auth print-access-token` on every call.
#[derive(Debug, Clone)]
pub struct GcloudCliTokenProvider {
    program: String,
    timeout: Duration,
}

impl GcloudCliTokenProvider {
    /// Creates a provider using `gcloud` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "gcloud".to_string(),
            timeout: Duration::from_secs(GCLOUD_TIMEOUT_SECONDS),
        }
    }

    /// Uses a different executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Overrides the command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GcloudCliTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates the standard output of `gcloud auth print-access-token`.
pub fn parse_cli_token(stdout: &str) -> Result<SecretString, AuthenticationError> {
    let token = stdout.trim();
    if token.is_empty() || token.contains("ERROR") {
        return Err(AuthenticationError::TokenUnavailable {
            message: "Invalid token received from gcloud. Run 'gcloud auth login' \
                      or set GOOGLE_ACCESS_TOKEN"
                .to_string(),
        });
    }
    Ok(SecretString::new(token.to_string()))
}

#[async_trait]
impl TokenProvider for GcloudCliTokenProvider {
    async fn access_token(&self) -> Result<SecretString, AuthenticationError> {
        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| AuthenticationError::TokenUnavailable {
                message: format!("{} timed out after {:?}", self.program, self.timeout),
            })?
            .map_err(|e| AuthenticationError::TokenUnavailable {
                message: if e.kind() == std::io::ErrorKind::NotFound {
                    format!("{} not found, install the Google Cloud SDK", self.program)
                } else {
                    format!("Failed to run {}: {e}", self.program)
                },
            })?;

        parse_cli_token(&String::from_utf8_lossy(&output.stdout))
    }
}
