//! Dotted/bracketed path lookup into attribute bags.
//!
//! Paths address nested mappings and lists: `deep.foo.bar`, `deep[foo][bar]`,
//! and `roles[0]` are all accepted, and the two styles may be mixed.

use serde_json::Value;

use crate::provider::AttributeBag;

/// Split a path into its segments.
///
/// A bracketed segment may itself be dotted: `[deep.foo]` is `deep`, `foo`.
/// Returns `None` for malformed paths (empty segments, unbalanced brackets).
pub fn parse_path(path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            let end = inner.find(']')?;
            for segment in inner[..end].split('.') {
                push_segment(&mut segments, segment)?;
            }
            rest = &inner[end + 1..];
        } else {
            let inner = if segments.is_empty() {
                rest
            } else {
                rest.strip_prefix('.')?
            };
            let end = inner.find(['.', '[']).unwrap_or(inner.len());
            push_segment(&mut segments, &inner[..end])?;
            rest = &inner[end..];
        }
    }

    Some(segments)
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) -> Option<()> {
    if segment.is_empty() || segment.contains([']', '[']) {
        return None;
    }
    segments.push(segment);
    Some(())
}

/// Resolve `path` inside `bag`.
///
/// Returns `None` if any segment is missing, indexes past the end of a list,
/// or descends into a scalar.
pub fn lookup<'a>(bag: &'a AttributeBag, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    let (first, rest) = segments.split_first()?;
    descend(bag.get(*first)?, rest)
}

fn descend<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(value);
    };

    let next = match value {
        Value::Object(map) => map.get(*segment)?,
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
        _ => return None,
    };
    descend(next, rest)
}

/// Render a scalar value for substitution into a policy name.
///
/// Lists, mappings, and nulls have no policy-name rendering.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag() -> AttributeBag {
        match json!({
            "id": "test-minion",
            "roles": ["web", "database"],
            "deep": { "foo": { "bar": { "baz": ["hello", "world"] } } },
            "port": 8200,
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_styles() {
        assert_eq!(parse_path("a.b.c"), Some(vec!["a", "b", "c"]));
        assert_eq!(parse_path("[a][b][0]"), Some(vec!["a", "b", "0"]));
        assert_eq!(parse_path("a[b].c[1]"), Some(vec!["a", "b", "c", "1"]));
        assert_eq!(parse_path("[deep.foo][0]"), Some(vec!["deep", "foo", "0"]));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_path("a..b"), None);
        assert_eq!(parse_path("a[b"), None);
        assert_eq!(parse_path("a[]"), None);
        assert_eq!(parse_path(".a"), None);
        assert_eq!(parse_path("a]"), None);
        assert_eq!(parse_path("[a..b]"), None);
        assert_eq!(parse_path("[.a]"), None);
    }

    #[test]
    fn test_lookup_nested() {
        let bag = bag();
        assert_eq!(lookup(&bag, "id"), Some(&json!("test-minion")));
        assert_eq!(lookup(&bag, "[deep][foo][bar][baz][1]"), Some(&json!("world")));
        assert_eq!(lookup(&bag, "deep.foo.bar.baz[0]"), Some(&json!("hello")));
        assert_eq!(lookup(&bag, "[deep.foo.bar.baz][1]"), Some(&json!("world")));
        assert_eq!(lookup(&bag, "roles"), Some(&json!(["web", "database"])));
    }

    #[test]
    fn test_lookup_missing() {
        let bag = bag();
        assert_eq!(lookup(&bag, "os"), None);
        assert_eq!(lookup(&bag, "roles[2]"), None);
        assert_eq!(lookup(&bag, "roles[first]"), None);
        assert_eq!(lookup(&bag, "id.nested"), None);
        assert_eq!(lookup(&bag, ""), None);
    }

    #[test]
    fn test_render_scalar() {
        assert_eq!(render_scalar(&json!("x")), Some("x".to_string()));
        assert_eq!(render_scalar(&json!(8200)), Some("8200".to_string()));
        assert_eq!(render_scalar(&json!(true)), Some("true".to_string()));
        assert_eq!(render_scalar(&json!(null)), None);
        assert_eq!(render_scalar(&json!(["a"])), None);
    }
}
