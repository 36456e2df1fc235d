//! Core types for the credential issuer.
//!
//! Provides the identity and policy-set model, per-call request options, the
//! issued `Credential`, and the collaborator traits the issuer is built on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity of a requester in the broker's namespace.
///
/// Identities are opaque strings (a minion ID, a host name, a service name).
/// The broker never rewrites them; only rendered policy names are lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Deduplicated set of concrete Vault policy names.
///
/// Iteration is sorted so that outgoing requests are deterministic; the order
/// carries no meaning for Vault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySet(BTreeSet<String>);

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a policy name. Returns `false` if it was already present.
    pub fn insert(&mut self, policy: impl Into<String>) -> bool {
        self.0.insert(policy.into())
    }

    pub fn contains(&self, policy: &str) -> bool {
        self.0.contains(policy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The policies as an ordered list, as sent on the wire.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PolicySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for PolicySet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Options a requester may attach to an issuance call.
///
/// `uses` and `ttl` only take effect when the issuer configuration allows
/// requester overrides; otherwise the configured defaults apply.
#[derive(Debug, Clone, Default)]
pub struct IssueOptions {
    /// Number of times the issued token may be used.
    pub uses: Option<u32>,
    /// Explicit maximum TTL as a Vault duration string (e.g. `"6h"`).
    pub ttl: Option<String>,
    /// Whether the host is requesting on behalf of the identity.
    pub impersonated_by_host: bool,
}

impl IssueOptions {
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses = Some(uses);
        self
    }

    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }
}

/// Host-supplied metadata about the request being served.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// ID of the job that triggered the request.
    pub job_id: Option<String>,
    /// User on whose behalf the job runs.
    pub acting_user: Option<String>,
}

/// A short-lived Vault token issued for a requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    /// The Vault client token.
    pub token: String,
    /// Whether Vault allows the token to be renewed.
    pub renewable: bool,
    /// Lease duration in seconds as reported by Vault.
    pub lease_duration: u64,
    /// Number of uses requested for the token.
    pub uses: u32,
    /// Unix timestamp (seconds) at which the token was issued.
    pub issued: i64,
    /// Vault address the token is valid against.
    pub url: String,
    /// Vault Enterprise namespace, if any.
    pub namespace: Option<String>,
    /// Whether TLS certificates should be verified when using the token.
    pub verify: bool,
}

/// Source of the policy set for an identity.
///
/// The default implementation is the templated resolver in
/// `vault-broker-policy`. Caching, if any, belongs to the implementation.
pub trait PolicyBackend: Send + Sync {
    /// Resolve the concrete policies that apply to `identity`.
    fn policies(&self, identity: &Identity) -> PolicySet;
}

/// Validates that a request really comes from the identity it names.
pub trait SignatureValidator: Send + Sync {
    /// Returns `true` if `signature` proves the caller is `identity`.
    ///
    /// `impersonated` is set when the host requests on behalf of `identity`.
    fn validate(&self, identity: &Identity, signature: &str, impersonated: bool) -> bool;
}

impl<F> SignatureValidator for F
where
    F: Fn(&Identity, &str, bool) -> bool + Send + Sync,
{
    fn validate(&self, identity: &Identity, signature: &str, impersonated: bool) -> bool {
        self(identity, signature, impersonated)
    }
}
