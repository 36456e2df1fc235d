//! Policy pattern templates and the per-resolution substitution scope.
//!
//! A pattern is literal text with `{...}` placeholders:
//! - `{identity}` - the requester's identity, verbatim
//! - `{attributes[path]}` - a value from the identity's attribute bag
//! - `{config[path]}` - a value from the identity's config bag
//!
//! `{{` and `}}` produce literal braces.

use std::cell::OnceCell;

use serde_json::Value;
use tracing::warn;
use vault_broker_engine::Identity;

use crate::path::{lookup, render_scalar};
use crate::provider::{AttributeBag, ConfigProvider};

/// A parsed piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    Literal(String),
    /// Placeholder body, without the braces.
    Field(&'a str),
}

/// Split a pattern into literal text and placeholders.
///
/// Returns `None` for unbalanced braces.
pub fn parse(pattern: &str) -> Option<Vec<Piece<'_>>> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        let brace = &rest[pos..];

        if brace.starts_with("{{") {
            literal.push('{');
            rest = &brace[2..];
        } else if brace.starts_with("}}") {
            literal.push('}');
            rest = &brace[2..];
        } else if brace.starts_with('}') {
            return None;
        } else {
            let body = &brace[1..];
            let end = body.find('}')?;
            let field = &body[..end];
            if field.contains('{') {
                return None;
            }
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Field(field));
            rest = &body[end + 1..];
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Some(pieces)
}

/// Escape braces so `text` is substituted literally.
pub fn escape(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// A resolved placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'s> {
    Identity(&'s str),
    Value(&'s Value),
}

/// Everything a pattern can reference for one identity.
///
/// The attribute bag is fetched up front. The config bag is fetched the first
/// time a `{config[...]}` placeholder is resolved and then reused for the rest
/// of this scope's lifetime, which is a single resolution call.
pub struct TemplateScope<'a> {
    identity: &'a Identity,
    attributes: AttributeBag,
    config: OnceCell<AttributeBag>,
    config_source: &'a dyn ConfigProvider,
    refresh_config: bool,
}

impl<'a> TemplateScope<'a> {
    pub fn new(
        identity: &'a Identity,
        attributes: AttributeBag,
        config_source: &'a dyn ConfigProvider,
        refresh_config: bool,
    ) -> Self {
        Self {
            identity,
            attributes,
            config: OnceCell::new(),
            config_source,
            refresh_config,
        }
    }

    pub fn identity(&self) -> &Identity {
        self.identity
    }

    /// Whether the config bag has been fetched yet.
    pub fn config_loaded(&self) -> bool {
        self.config.get().is_some()
    }

    fn config(&self) -> &AttributeBag {
        self.config.get_or_init(|| {
            match self.config_source.config(self.identity, self.refresh_config) {
                Ok(bag) => bag,
                Err(err) => {
                    warn!(
                        identity = %self.identity,
                        error = %err,
                        "config lookup failed, config placeholders will not resolve"
                    );
                    AttributeBag::new()
                }
            }
        })
    }

    /// Resolve a placeholder body such as `attributes[roles][0]`.
    ///
    /// Returns `None` for unknown placeholder names and missing paths.
    pub fn resolve_field(&self, field: &str) -> Option<Resolved<'_>> {
        let split = field.find(['[', '.']).unwrap_or(field.len());
        let (name, path) = field.split_at(split);
        let path = path.strip_prefix('.').unwrap_or(path);

        match name {
            "identity" if name == field => Some(Resolved::Identity(self.identity.as_str())),
            "attributes" => lookup(&self.attributes, path).map(Resolved::Value),
            "config" => lookup(self.config(), path).map(Resolved::Value),
            _ => None,
        }
    }

    /// Substitute every placeholder in `pattern`.
    ///
    /// Returns `None` if any placeholder does not resolve to a scalar.
    /// Placeholders are resolved left to right and resolution stops at the
    /// first failure.
    pub fn render(&self, pattern: &str) -> Option<String> {
        let mut rendered = String::with_capacity(pattern.len());
        for piece in parse(pattern)? {
            match piece {
                Piece::Literal(text) => rendered.push_str(&text),
                Piece::Field(field) => match self.resolve_field(field)? {
                    Resolved::Identity(id) => rendered.push_str(id),
                    Resolved::Value(value) => rendered.push_str(&render_scalar(value)?),
                },
            }
        }
        Some(rendered)
    }
}
