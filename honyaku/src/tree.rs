//! Key-level structural diff of nested JSON mappings
//!
//! Structured-data files map stable identifiers (text IDs, character IDs, ...)
//! to either strings or further mappings. The reference corpus holds the keys
//! that are already translated, so the interesting part of a raw file is the
//! set of key paths the reference does not have yet.
//!
//! Rules, applied per key of the source mapping:
//!
//! - reference has no such key: the whole value is new and copied over
//! - both values are mappings: recurse, keep the key only if the nested diff
//!   is non-empty
//! - otherwise (either side is a leaf): the key is considered handled and is
//!   dropped, whatever the values are
//!
//! A missing reference mapping means everything is new.

use serde_json::{Map, Value};

/// A nested mapping from string keys to leaves or further mappings
pub type KeyTree = Map<String, Value>;

/// Compute the subtree of `source` whose key paths are absent from `reference`
///
/// Key order follows `source`.
///
/// # Example
///
/// ```
/// use honyaku::tree::diff_tree;
/// use serde_json::json;
///
/// let raw = json!({"1": {"10": "古い", "11": "新しい"}, "2": "追加"});
/// let reference = json!({"1": {"10": "old"}});
///
/// let diff = diff_tree(raw.as_object().unwrap(), reference.as_object());
/// assert_eq!(serde_json::Value::Object(diff), json!({"1": {"11": "新しい"}, "2": "追加"}));
/// ```
pub fn diff_tree(source: &KeyTree, reference: Option<&KeyTree>) -> KeyTree {
    let Some(reference) = reference else {
        return source.clone();
    };

    let mut diff = KeyTree::new();
    for (key, value) in source {
        match reference.get(key) {
            None => {
                diff.insert(key.clone(), value.clone());
            }
            Some(Value::Object(ref_child)) => {
                if let Value::Object(child) = value {
                    let nested = diff_tree(child, Some(ref_child));
                    if !nested.is_empty() {
                        diff.insert(key.clone(), Value::Object(nested));
                    }
                }
            }
            // Present on both sides with a leaf somewhere: already reconciled
            Some(_) => {}
        }
    }
    diff
}

/// [`diff_tree`] over arbitrary JSON roots
///
/// A `null` reference counts as no reference. Returns `None` when `source` is
/// not a mapping, or when `reference` is something other than a mapping or
/// `null`, since there are no keys to compare.
pub fn diff_value(source: &Value, reference: Option<&Value>) -> Option<KeyTree> {
    let Value::Object(source) = source else {
        return None;
    };
    match reference {
        None | Some(Value::Null) => Some(diff_tree(source, None)),
        Some(Value::Object(reference)) => Some(diff_tree(source, Some(reference))),
        Some(_) => None,
    }
}

/// Count terminal values at any depth; arrays and scalars count as one leaf each
pub fn count_leaves(tree: &KeyTree) -> usize {
    tree.values()
        .map(|value| match value {
            Value::Object(child) => count_leaves(child),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> KeyTree {
        match value {
            Value::Object(map) => map,
            other => panic!("test fixture must be an object, got {}", other),
        }
    }

    fn fixture() -> KeyTree {
        tree(json!({
            "6": {
                "1001": "スペシャルウィーク",
                "1002": "サイレンススズカ"
            },
            "47": {
                "1001": {"0": "こんにちは", "1": "ありがとう"}
            },
            "flag": true
        }))
    }

    #[test]
    fn test_diff_against_nothing_is_identity() {
        let source = fixture();
        assert_eq!(diff_tree(&source, None), source);
    }

    #[test]
    fn test_diff_against_self_is_empty() {
        let source = fixture();
        assert!(diff_tree(&source, Some(&source)).is_empty());
    }

    #[test]
    fn test_disjoint_keys_return_source() {
        let a = tree(json!({"x": "一", "y": {"z": "二"}}));
        let b = tree(json!({"p": "one", "q": {"z": "two"}}));
        assert_eq!(diff_tree(&a, Some(&b)), a);
    }

    #[test]
    fn test_nested_new_keys_only() {
        let source = fixture();
        let reference = tree(json!({
            "6": {"1001": "Special Week"},
            "47": {"1001": {"0": "Hello"}}
        }));

        let diff = diff_tree(&source, Some(&reference));
        assert_eq!(
            Value::Object(diff),
            json!({
                "6": {"1002": "サイレンススズカ"},
                "47": {"1001": {"1": "ありがとう"}},
                "flag": true
            })
        );
    }

    #[test]
    fn test_shared_leaf_keys_are_dropped_regardless_of_value() {
        let source = tree(json!({"a": "違う", "b": {"c": "値"}}));
        let reference = tree(json!({"a": "different", "b": "flattened"}));
        assert!(diff_tree(&source, Some(&reference)).is_empty());
    }

    #[test]
    fn test_source_leaf_against_reference_mapping_is_dropped() {
        let source = tree(json!({"a": "葉"}));
        let reference = tree(json!({"a": {"nested": "x"}}));
        assert!(diff_tree(&source, Some(&reference)).is_empty());
    }

    #[test]
    fn test_empty_nested_diff_omits_key() {
        let source = tree(json!({"a": {"b": "x"}, "c": "新"}));
        let reference = tree(json!({"a": {"b": "y"}}));
        let diff = diff_tree(&source, Some(&reference));
        assert!(!diff.contains_key("a"));
        assert!(diff.contains_key("c"));
    }

    #[test]
    fn test_key_order_follows_source() {
        let source = tree(json!({"z": "1", "a": "2", "m": "3"}));
        let reference = tree(json!({"a": "x"}));
        let diff = diff_tree(&source, Some(&reference));
        let keys: Vec<&String> = diff.keys().collect();
        assert_eq!(keys, vec!["z", "m"]);
    }

    #[test]
    fn test_diff_value_roots() {
        let source = json!({"1": "一", "2": "二"});
        let reference = json!({"1": "one"});

        assert_eq!(
            diff_value(&source, Some(&reference)).map(Value::Object),
            Some(json!({"2": "二"}))
        );
        assert_eq!(
            diff_value(&source, Some(&Value::Null)).map(Value::Object),
            Some(source.clone())
        );
        assert_eq!(diff_value(&source, None).map(Value::Object), Some(source.clone()));

        assert_eq!(diff_value(&json!(["一"]), Some(&reference)), None);
        assert_eq!(diff_value(&source, Some(&json!("text"))), None);
    }

    #[test]
    fn test_count_leaves() {
        assert_eq!(count_leaves(&fixture()), 5);
        assert_eq!(count_leaves(&KeyTree::new()), 0);
        // Arrays are a single leaf
        assert_eq!(count_leaves(&tree(json!({"list": [1, 2, 3]}))), 1);
    }

    #[test]
    fn test_count_leaves_of_full_diff_matches_source() {
        let source = fixture();
        let diff = diff_tree(&source, Some(&KeyTree::new()));
        assert_eq!(count_leaves(&diff), count_leaves(&source));
    }
}
