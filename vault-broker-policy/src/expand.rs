//! Pattern expansion ahead of substitution.

use serde_json::Value;

use crate::path::render_scalar;
use crate::template::{escape, parse, Piece, Resolved, TemplateScope};

/// Turns one configured pattern into zero or more patterns to substitute.
pub trait PatternExpander: Send + Sync {
    fn expand(&self, pattern: &str, scope: &TemplateScope<'_>) -> Vec<String>;
}

/// Expander that passes patterns through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl PatternExpander for Verbatim {
    fn expand(&self, pattern: &str, _scope: &TemplateScope<'_>) -> Vec<String> {
        vec![pattern.to_string()]
    }
}

/// Expands list-valued placeholders into one pattern per element.
///
/// `role:{attributes[roles]}` with `roles = ["web", "db"]` becomes
/// `role:web` and `role:db`. Several list placeholders in one pattern produce
/// the cross product. An empty list produces no patterns. Elements that are
/// not scalars are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListExpander;

impl PatternExpander for ListExpander {
    fn expand(&self, pattern: &str, scope: &TemplateScope<'_>) -> Vec<String> {
        let Some(pieces) = parse(pattern) else {
            return vec![pattern.to_string()];
        };

        let list = pieces.iter().find_map(|piece| match piece {
            Piece::Field(field) => match scope.resolve_field(field) {
                Some(Resolved::Value(Value::Array(items))) => Some((*field, items)),
                _ => None,
            },
            Piece::Literal(_) => None,
        });
        let Some((field, items)) = list else {
            return vec![pattern.to_string()];
        };

        items
            .iter()
            .filter_map(render_scalar)
            .flat_map(|item| self.expand(&substitute(&pieces, field, &item), scope))
            .collect()
    }
}

/// Reassemble a parsed pattern with every `{field}` replaced by `item`.
///
/// Literal text is re-escaped, so escaped braces stay literal.
fn substitute(pieces: &[Piece<'_>], field: &str, item: &str) -> String {
    let mut pattern = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(text) => pattern.push_str(&escape(text)),
            Piece::Field(name) if *name == field => pattern.push_str(&escape(item)),
            Piece::Field(name) => {
                pattern.push('{');
                pattern.push_str(name);
                pattern.push('}');
            }
        }
    }
    pattern
}
