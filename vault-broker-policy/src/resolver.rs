//! Templated policy resolver.

use std::sync::Arc;

use tracing::{debug, warn};
use vault_broker_engine::{Identity, PolicyBackend, PolicySet};

use crate::config::PolicyConfig;
use crate::expand::{ListExpander, PatternExpander};
use crate::provider::{AttributeBag, AttributeProvider, ConfigProvider};
use crate::template::TemplateScope;

/// Resolves policy patterns into concrete Vault policy names for an identity.
///
/// Each pattern is expanded (list placeholders fan out), substituted against
/// the identity's attributes and config, and lower-cased. Patterns that do
/// not fully resolve contribute nothing; one bad pattern never blocks the
/// others.
pub struct PolicyResolver {
    config: PolicyConfig,
    attributes: Arc<dyn AttributeProvider>,
    config_source: Arc<dyn ConfigProvider>,
    expander: Box<dyn PatternExpander>,
}

impl PolicyResolver {
    /// Create a resolver that expands list placeholders.
    pub fn new(
        config: PolicyConfig,
        attributes: Arc<dyn AttributeProvider>,
        config_source: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            config,
            attributes,
            config_source,
            expander: Box::new(ListExpander),
        }
    }

    /// Replace the pattern expander.
    pub fn with_expander(mut self, expander: impl PatternExpander + 'static) -> Self {
        self.expander = Box::new(expander);
        self
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Resolve `patterns` for `identity`.
    ///
    /// The config provider is called at most once, and only if some pattern
    /// references `{config[...]}`. `refresh_config` is forwarded to it.
    pub fn resolve(
        &self,
        identity: &Identity,
        patterns: &[String],
        refresh_config: bool,
    ) -> PolicySet {
        let attributes = self.attributes.attributes(identity).unwrap_or_else(|err| {
            warn!(%identity, error = %err, "attribute lookup failed, using empty attributes");
            AttributeBag::new()
        });
        let scope = TemplateScope::new(
            identity,
            attributes,
            self.config_source.as_ref(),
            refresh_config,
        );

        let mut policies = PolicySet::new();
        for pattern in patterns {
            for expanded in self.expander.expand(pattern, &scope) {
                match scope.render(&expanded) {
                    Some(policy) => {
                        policies.insert(policy.to_lowercase());
                    }
                    None => {
                        debug!(%identity, pattern = %expanded, "policy pattern did not resolve")
                    }
                }
            }
        }
        policies
    }

    /// Resolve the configured patterns for `identity` without issuing anything.
    pub fn show_policies(&self, identity: &Identity, refresh_config: bool) -> PolicySet {
        self.resolve(identity, &self.config.patterns, refresh_config)
    }
}

impl PolicyBackend for PolicyResolver {
    fn policies(&self, identity: &Identity) -> PolicySet {
        self.show_policies(identity, self.config.refresh_config)
    }
}
