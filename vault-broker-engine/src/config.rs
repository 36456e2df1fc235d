//! TOML configuration for the credential issuer.
//!
//! The issuer reads the `[vault]` table of the broker configuration file:
//!
//! ```toml
//! [vault]
//! url = "https://vault.example.com:8200"
//! namespace = "platform"
//! role_name = "broker"
//! allow_override = true
//! uses = 1
//!
//! [vault.auth]
//! method = "approle"
//! role_id = "..."
//! secret_id = "..."
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::auth::AuthMethod;
use crate::error::ConfigError;

const LOGIN_PATH: &str = "v1/auth/approle/login";
const TOKEN_CREATE_PATH: &str = "v1/auth/token/create";

/// Vault connection and issuance settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Base URL of the Vault server.
    #[serde(default)]
    pub url: String,

    /// Vault Enterprise namespace sent with every request.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Token role used for creation (`/v1/auth/token/create/{role_name}`).
    #[serde(default)]
    pub role_name: Option<String>,

    /// Verify TLS certificates.
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// Timeout in seconds applied to each request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether requesters may choose `uses` and `ttl` for their token.
    #[serde(default = "default_allow_override")]
    pub allow_override: bool,

    /// Default number of uses per issued token.
    #[serde(default = "default_uses")]
    pub uses: u32,

    /// Default explicit max TTL (Vault duration string).
    #[serde(default)]
    pub ttl: Option<String>,

    /// How the broker itself authenticates to Vault.
    pub auth: AuthMethod,
}

fn default_verify() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_allow_override() -> bool {
    true
}

fn default_uses() -> u32 {
    1
}

#[derive(Deserialize)]
struct Document {
    vault: VaultConfig,
}

impl VaultConfig {
    /// Create a configuration with defaults for everything but url and auth.
    pub fn new(url: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            url: url.into(),
            namespace: None,
            role_name: None,
            verify: default_verify(),
            timeout_secs: default_timeout_secs(),
            allow_override: default_allow_override(),
            uses: default_uses(),
            ttl: None,
            auth,
        }
    }

    /// Load the `[vault]` table from a TOML file and validate it.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse the `[vault]` table from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let document: Document = toml::from_str(content)?;
        document.vault.validate()?;
        Ok(document.vault)
    }

    /// Check that the configuration can be used to talk to Vault at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        // Vault reads zero uses as unlimited
        if self.uses == 0 {
            return Err(ConfigError::InvalidUses);
        }
        self.auth.validate()
    }

    /// The base URL with a single trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.strip_suffix('/').unwrap_or(&self.url)
    }

    /// Endpoint for AppRole login.
    pub fn login_url(&self) -> String {
        format!("{}/{LOGIN_PATH}", self.base_url())
    }

    /// Endpoint for token creation, scoped to the token role if one is set.
    pub fn token_create_url(&self) -> String {
        match &self.role_name {
            Some(role) => format!("{}/{TOKEN_CREATE_PATH}/{role}", self.base_url()),
            None => format!("{}/{TOKEN_CREATE_PATH}", self.base_url()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_role_name(mut self, role_name: impl Into<String>) -> Self {
        self.role_name = Some(role_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_config(url: &str) -> VaultConfig {
        VaultConfig::new(
            url,
            AuthMethod::Token {
                token: "test".into(),
            },
        )
    }

    #[test]
    fn test_token_create_url() {
        assert_eq!(
            token_config("http://127.0.0.1").token_create_url(),
            "http://127.0.0.1/v1/auth/token/create"
        );
        assert_eq!(
            token_config("https://127.0.0.1/").token_create_url(),
            "https://127.0.0.1/v1/auth/token/create"
        );
        assert_eq!(
            token_config("http://127.0.0.1:8200")
                .with_role_name("therole")
                .token_create_url(),
            "http://127.0.0.1:8200/v1/auth/token/create/therole"
        );
        assert_eq!(
            token_config("https://127.0.0.1/test")
                .with_role_name("therole")
                .token_create_url(),
            "https://127.0.0.1/test/v1/auth/token/create/therole"
        );
    }

    #[test]
    fn test_login_url() {
        assert_eq!(
            token_config("http://127.0.0.1/").login_url(),
            "http://127.0.0.1/v1/auth/approle/login"
        );
    }

    #[test]
    fn test_parse_token_config() {
        let config = VaultConfig::from_toml(
            r#"
[vault]
url = "http://127.0.0.1:8200"
namespace = "test_namespace"

[vault.auth]
method = "token"
token = "s.abcdef"
            "#,
        )
        .expect("Failed to parse config");

        assert_eq!(config.namespace.as_deref(), Some("test_namespace"));
        assert!(config.verify);
        assert!(config.allow_override);
        assert_eq!(config.uses, 1);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert!(matches!(config.auth, AuthMethod::Token { .. }));
    }

    #[test]
    fn test_parse_approle_config() {
        let config = VaultConfig::from_toml(
            r#"
[vault]
url = "http://127.0.0.1"
allow_override = false
uses = 3
ttl = "1h"

[vault.auth]
method = "approle"
role_id = "role"
            "#,
        )
        .expect("Failed to parse config");

        assert!(!config.allow_override);
        assert_eq!(config.uses, 3);
        assert_eq!(config.ttl.as_deref(), Some("1h"));
        match config.auth {
            AuthMethod::AppRole { role_id, secret_id } => {
                assert_eq!(role_id, "role");
                assert!(secret_id.is_none());
            }
            other => panic!("unexpected auth method: {other:?}"),
        }
    }

    #[test]
    fn test_missing_url_rejected() {
        let err = VaultConfig::from_toml(
            r#"
[vault.auth]
method = "token"
token = "test"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingUrl));
    }

    #[test]
    fn test_empty_token_rejected() {
        let base = token_config("http://127.0.0.1");
        let err = VaultConfig {
            auth: AuthMethod::Token {
                token: String::new(),
            },
            ..base
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAuth(_)));
    }

    #[test]
    fn test_zero_uses_rejected() {
        let mut config = token_config("http://127.0.0.1");
        config.uses = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUses)));

        let err = VaultConfig::from_toml(
            r#"
[vault]
url = "http://127.0.0.1"
uses = 0

[vault.auth]
method = "token"
token = "test"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUses));
    }

    #[test]
    fn test_unknown_auth_method_rejected() {
        let err = VaultConfig::from_toml(
            r#"
[vault]
url = "http://127.0.0.1"

[vault.auth]
method = "kerberos"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = token_config("http://127.0.0.1");
        config.timeout_secs = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidTimeout
        ));
    }
}
