//! TOML configuration for the policy resolver.
//!
//! Read from the `[policy]` table of the broker configuration file:
//!
//! ```toml
//! [policy]
//! patterns = [
//!     "vault-broker/identity/{identity}",
//!     "vault-broker/role/{attributes[roles]}",
//!     "vault-broker/team/{config[team]}",
//! ]
//! refresh_config = true
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Errors from policy configuration parsing.
#[derive(Error, Debug)]
pub enum PolicyConfigError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse policy TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Policy resolution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Ordered policy patterns.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Ask the config provider for a fresh rendering on every resolution.
    #[serde(default)]
    pub refresh_config: bool,
}

fn default_patterns() -> Vec<String> {
    vec![
        "vault-broker/identity/{identity}".to_string(),
        "vault-broker/identities".to_string(),
    ]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            refresh_config: false,
        }
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    policy: PolicyConfig,
}

impl PolicyConfig {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            refresh_config: false,
        }
    }

    /// Load the `[policy]` table from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse the `[policy]` table from a TOML string. A missing table yields
    /// the default patterns.
    pub fn parse(content: &str) -> Result<Self, PolicyConfigError> {
        let document: Document = toml::from_str(content)?;
        Ok(document.policy)
    }
}
