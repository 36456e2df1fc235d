//! # Vault Policy Broker
//!
//! Convenience crate that re-exports the credential issuer together with the
//! default templated policy backend.
//!
//! For custom policy backends, depend on `vault-broker-engine` directly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vault_broker::{
//!     CredentialIssuer, Identity, IssueOptions, NoData, PolicyConfig, PolicyResolver,
//!     RequestContext, SignatureValidator, VaultConfig,
//! };
//!
//! let toml = r#"
//!     [vault]
//!     url = "https://vault.example.com:8200"
//!
//!     [vault.auth]
//!     method = "token"
//!     token = "s.broker-token"
//!
//!     [policy]
//!     patterns = ["vault-broker/identity/{identity}", "vault-broker/role/{attributes[roles]}"]
//! "#;
//!
//! let vault = VaultConfig::from_toml(toml).expect("Failed to parse vault config");
//! let policy = PolicyConfig::parse(toml).expect("Failed to parse policy config");
//!
//! // Resolve policies from identity attributes (none here)
//! let resolver = PolicyResolver::new(policy, Arc::new(NoData), Arc::new(NoData));
//!
//! // Accept every caller; real deployments verify a signature here
//! let validator: Arc<dyn SignatureValidator> =
//!     Arc::new(|_: &Identity, _: &str, _: bool| true);
//!
//! let issuer = CredentialIssuer::new(vault, resolver, validator)
//!     .expect("Failed to build issuer");
//!
//! let credential = issuer
//!     .issue(
//!         &Identity::new("web01"),
//!         "signature",
//!         &IssueOptions::default().with_uses(3),
//!         &RequestContext::default(),
//!     )
//!     .expect("Failed to issue token");
//! println!("issued token valid for {} uses", credential.uses);
//! ```

// Re-export everything from the engine crate
pub use vault_broker_engine::*;

// Re-export the default policy backend
pub use vault_broker_policy::{
    AttributeBag, AttributeProvider, ConfigProvider, ListExpander, NoData, PatternExpander,
    PolicyConfig, PolicyConfigError, PolicyResolver, ProviderError, TemplateScope, Verbatim,
};
