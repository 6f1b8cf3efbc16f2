//! Slash-delimited path lookups over parsed JSON documents
//!
//! Status and notification payloads are navigated with paths such as
//! `"account/display_name"` rather than deserialized into structs: the
//! renderer only needs a handful of fields and must keep going when any of
//! them is missing.

use serde_json::Value;

/// Result of walking a path through a document
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    /// The node reached. When `found` is false this is the last node that
    /// did resolve, not the requested one.
    pub node: &'a Value,
    pub found: bool,
}

impl<'a> Lookup<'a> {
    /// The node, only if the whole path resolved
    pub fn get(self) -> Option<&'a Value> {
        self.found.then_some(self.node)
    }

    /// String value at the resolved path
    pub fn as_str(self) -> Option<&'a str> {
        self.get().and_then(Value::as_str)
    }

    /// True when the path resolved to something other than `null`
    pub fn is_present(self) -> bool {
        matches!(self.get(), Some(v) if !v.is_null())
    }
}

/// Walk `path` from `root`, one `/`-separated segment at a time.
///
/// Each segment is looked up as a direct member of the current node. Arrays
/// and scalars have no members, so a segment applied to them is not found.
/// Empty segments (from `"a//b"` or a leading slash) are skipped, so an
/// empty path returns the root.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Lookup<'a> {
    let mut node = root;

    for key in path.split('/').filter(|k| !k.is_empty()) {
        match node.as_object().and_then(|obj| obj.get(key)) {
            Some(next) => node = next,
            None => return Lookup { node, found: false },
        }
    }

    Lookup { node, found: true }
}

/// String at `path`, or `""` when absent or not a string
pub fn str_at<'a>(root: &'a Value, path: &str) -> &'a str {
    lookup(root, path).as_str().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_path() {
        let doc = json!({"a": {"b": {"c": 42}}});
        let hit = lookup(&doc, "a/b/c");
        assert!(hit.found);
        assert_eq!(hit.node, &json!(42));
    }

    #[test]
    fn missing_leaf_returns_last_valid_ancestor() {
        let doc = json!({"a": {"b": {"x": 1}}});
        let miss = lookup(&doc, "a/b/c");
        assert!(!miss.found);
        assert_eq!(miss.node, &json!({"x": 1}));
        assert!(miss.get().is_none());
    }

    #[test]
    fn empty_path_is_root() {
        let doc = json!({"a": 1});
        let hit = lookup(&doc, "");
        assert!(hit.found);
        assert_eq!(hit.node, &doc);
    }

    #[test]
    fn scalar_has_no_children() {
        let doc = json!({"a": "text"});
        let miss = lookup(&doc, "a/b");
        assert!(!miss.found);
        assert_eq!(miss.node, &json!("text"));

        let arr = json!([1, 2, 3]);
        assert!(!lookup(&arr, "0").found);
    }

    #[test]
    fn null_member_is_found_but_not_present() {
        let doc = json!({"reblog": null});
        let hit = lookup(&doc, "reblog");
        assert!(hit.found);
        assert!(!hit.is_present());
        assert!(!lookup(&doc, "application/name").is_present());
    }

    #[test]
    fn str_at_defaults_to_empty() {
        let doc = json!({"account": {"acct": "alice", "display_name": null}});
        assert_eq!(str_at(&doc, "account/acct"), "alice");
        assert_eq!(str_at(&doc, "account/display_name"), "");
        assert_eq!(str_at(&doc, "account/missing"), "");
    }

    #[test]
    fn does_not_mutate_document() {
        let doc = json!({"a": {"b": 1}});
        let before = doc.clone();
        let _ = lookup(&doc, "a/zzz/b");
        assert_eq!(doc, before);
    }
}
