//! Error types for the credential issuer.

use thiserror::Error;

use crate::transport::TransportError;
use crate::types::Identity;

/// Reason reported when no configured pattern produced a policy.
pub const NO_POLICIES_MATCHED: &str = "No policies matched identity";

/// Errors returned from an issuance call.
///
/// Every variant is an ordinary outcome of `CredentialIssuer::issue`; the
/// `Display` text of the remote and transport variants is the detail reported
/// by Vault or the HTTP stack, unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// The caller's signature did not validate for the claimed identity.
    #[error("signature validation failed for '{identity}'")]
    Authentication { identity: Identity },

    /// Policy resolution produced nothing to issue a token for.
    #[error("{0}")]
    Policy(String),

    /// Vault answered with a non-success status.
    #[error("{0}")]
    RemoteService(String),

    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

impl From<TransportError> for IssueError {
    fn from(err: TransportError) -> Self {
        IssueError::Transport(err.to_string())
    }
}

/// Errors from issuer configuration. These are fatal at construction time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read vault config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse vault config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("vault url must be set")]
    MissingUrl,

    #[error("vault timeout must be greater than zero")]
    InvalidTimeout,

    #[error("token uses must be greater than zero")]
    InvalidUses,

    #[error("invalid vault auth config: {0}")]
    InvalidAuth(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
