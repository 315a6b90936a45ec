//! Minimal dotted JSON path lookup.
//!
//! `data.price` walks object keys, an all-digit segment such as
//! `result.0.last` indexes arrays, and `\.` escapes a literal dot in a
//! key (`rates.BTC\.USD`).

use serde_json::Value;

/// Split a path into segments, honouring `\.` escapes.
fn segments(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

/// Resolve `path` inside `root`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).iter().try_fold(root, |node, key| match node {
        Value::Object(map) => map.get(key.as_str()),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object() {
        let doc = json!({"data": {"price": "0.012"}});
        assert_eq!(lookup(&doc, "data.price"), Some(&json!("0.012")));
    }

    #[test]
    fn test_array_index() {
        let doc = json!({"result": [{"last": 1.5}, {"last": 2.5}]});
        assert_eq!(lookup(&doc, "result.1.last"), Some(&json!(2.5)));
        assert_eq!(lookup(&doc, "result.7.last"), None);
    }

    #[test]
    fn test_escaped_dot() {
        let doc = json!({"rates": {"BTC.USD": "100"}});
        assert_eq!(lookup(&doc, r"rates.BTC\.USD"), Some(&json!("100")));
    }

    #[test]
    fn test_missing_and_scalar_traversal() {
        let doc = json!({"a": 1});
        assert_eq!(lookup(&doc, "b"), None);
        assert_eq!(lookup(&doc, "a.b"), None);
    }

    #[test]
    fn test_top_level_array() {
        let doc = json!([{"price": "3"}]);
        assert_eq!(lookup(&doc, "0.price"), Some(&json!("3")));
    }
}
