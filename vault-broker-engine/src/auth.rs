//! Authentication backends the broker uses to obtain its own Vault token.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::VaultConfig;
use crate::error::{ConfigError, IssueError};
use crate::transport::{HttpRequest, Transport, NAMESPACE_HEADER};
use crate::wire::{AuthResponse, LoginAuth, LoginRequest};

/// How the broker authenticates before creating tokens.
///
/// Selected by `method` in the `[vault.auth]` table.
#[derive(Clone, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum AuthMethod {
    /// Use a long-lived token directly.
    Token { token: String },
    /// Exchange a role ID (and optional secret ID) for a token on each call.
    AppRole {
        role_id: String,
        #[serde(default)]
        secret_id: Option<String>,
    },
}

impl AuthMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Token { .. } => "token",
            AuthMethod::AppRole { .. } => "approle",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AuthMethod::Token { token } if token.trim().is_empty() => Err(
                ConfigError::InvalidAuth("token method requires a non-empty token".into()),
            ),
            AuthMethod::AppRole { role_id, .. } if role_id.trim().is_empty() => Err(
                ConfigError::InvalidAuth("approle method requires a non-empty role_id".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Produce the token to present in `X-Vault-Token` when creating tokens.
    ///
    /// For AppRole this performs the login exchange; failures come back as
    /// `RemoteService` (non-2xx) or `Transport` errors.
    pub fn caller_token(
        &self,
        config: &VaultConfig,
        transport: &dyn Transport,
    ) -> Result<String, IssueError> {
        match self {
            AuthMethod::Token { token } => Ok(token.clone()),
            AuthMethod::AppRole { role_id, secret_id } => {
                let body = serde_json::to_value(LoginRequest {
                    role_id,
                    secret_id: secret_id.as_deref(),
                })
                .map_err(|e| IssueError::Transport(e.to_string()))?;
                let mut request = HttpRequest::new(config.login_url(), body);
                if let Some(namespace) = &config.namespace {
                    request = request.with_header(NAMESPACE_HEADER, namespace.as_str());
                }

                debug!(url = %request.url, "logging in to vault with approle");
                let response = transport.post(&request)?;
                if !response.is_success() {
                    let reason = response.reason_or_status();
                    warn!(status = response.status, %reason, "approle login rejected");
                    return Err(IssueError::RemoteService(reason));
                }

                let login: AuthResponse<LoginAuth> = response.json()?;
                Ok(login.auth.client_token)
            }
        }
    }
}

// Never print credentials.
impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"<redacted>")
                .finish(),
            AuthMethod::AppRole { role_id, secret_id } => f
                .debug_struct("AppRole")
                .field("role_id", role_id)
                .field("secret_id", &secret_id.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let token = AuthMethod::Token {
            token: "s.secret".into(),
        };
        assert!(!format!("{token:?}").contains("s.secret"));

        let approle = AuthMethod::AppRole {
            role_id: "role".into(),
            secret_id: Some("hunter2".into()),
        };
        let rendered = format!("{approle:?}");
        assert!(rendered.contains("role"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_validate_rejects_blank_role_id() {
        let approle = AuthMethod::AppRole {
            role_id: "  ".into(),
            secret_id: None,
        };
        assert!(matches!(
            approle.validate(),
            Err(ConfigError::InvalidAuth(_))
        ));
    }
}
