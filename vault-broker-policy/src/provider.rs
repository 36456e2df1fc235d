//! Collaborators that supply per-identity data to the resolver.

use serde_json::{Map, Value};
use thiserror::Error;
use vault_broker_engine::Identity;

/// Nested mapping of identity data (scalars, lists, mappings).
pub type AttributeBag = Map<String, Value>;

/// Failure reported by an attribute or config provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Supplies the static attributes of an identity.
///
/// Unknown identities should yield an empty bag rather than an error, so
/// patterns that only use `{identity}` still resolve for them.
pub trait AttributeProvider: Send + Sync {
    fn attributes(&self, identity: &Identity) -> Result<AttributeBag, ProviderError>;
}

/// Supplies identity-specific configuration data.
///
/// Producing this bag is assumed to be expensive (it is typically rendered per
/// request), so the resolver calls it at most once per resolution and only
/// when a pattern needs it. `force_refresh` asks for a fresh rendering instead
/// of any memoized copy.
pub trait ConfigProvider: Send + Sync {
    fn config(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> Result<AttributeBag, ProviderError>;
}

/// Provider with no data for any identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoData;

impl AttributeProvider for NoData {
    fn attributes(&self, _identity: &Identity) -> Result<AttributeBag, ProviderError> {
        Ok(AttributeBag::new())
    }
}

impl ConfigProvider for NoData {
    fn config(
        &self,
        _identity: &Identity,
        _force_refresh: bool,
    ) -> Result<AttributeBag, ProviderError> {
        Ok(AttributeBag::new())
    }
}
