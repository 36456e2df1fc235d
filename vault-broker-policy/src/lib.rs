//! # Vault Broker Policy
//!
//! Default templated policy backend for the Vault policy broker.
//!
//! Policy patterns reference the requester's identity, its attribute bag, and
//! its (lazily fetched) config bag. Each pattern resolves to zero or more
//! lower-cased Vault policy names.

mod config;
pub mod expand;
pub mod path;
mod provider;
mod resolver;
pub mod template;

pub use config::{PolicyConfig, PolicyConfigError};
pub use expand::{ListExpander, PatternExpander, Verbatim};
pub use provider::{AttributeBag, AttributeProvider, ConfigProvider, NoData, ProviderError};
pub use resolver::PolicyResolver;
pub use template::TemplateScope;
