//! # Vault Broker Engine
//!
//! Credential issuance core for the Vault policy broker.
//!
//! This crate provides:
//! - `PolicyBackend` trait for pluggable policy resolution
//! - `AuthMethod` backends for the broker's own Vault login (token, AppRole)
//! - `Transport` trait with a blocking reqwest implementation
//! - `CredentialIssuer` that validates callers, resolves policies, and
//!   exchanges them for a scoped, limited-use Vault token

pub mod auth;
pub mod config;
pub mod error;
pub mod issuer;
pub mod transport;
pub mod types;
pub mod wire;

pub use auth::AuthMethod;
pub use config::VaultConfig;
pub use error::{ConfigError, IssueError, NO_POLICIES_MATCHED};
pub use issuer::CredentialIssuer;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use types::{
    Credential, Identity, IssueOptions, PolicyBackend, PolicySet, RequestContext,
    SignatureValidator,
};
pub use wire::{TokenCreateRequest, TokenMeta};
