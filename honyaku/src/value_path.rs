//! Access paths into JSON values
//!
//! A [`JsonPath`] is an ordered list of mapping keys and array indices. Paths
//! produced by the harvester resolve back into the same document, which is how
//! the review loop writes accepted translations in place.
//!
//! # Example
//!
//! ```
//! use honyaku::value_path::{JsonPath, get_at_path, set_at_path};
//! use serde_json::json;
//!
//! let mut doc = json!({"menu": {"items": ["開く", "閉じる"]}});
//! let path = JsonPath::new().key("menu").key("items").index(1);
//!
//! set_at_path(&mut doc, &path, json!("Close")).unwrap();
//! assert_eq!(get_at_path(&doc, &path).unwrap(), &json!("Close"));
//! assert_eq!(path.to_string(), "menu -> items -> 1");
//! ```

use serde_json::Value;
use std::fmt;

/// One step of a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Key into a JSON object
    Key(String),
    /// Position inside a JSON array
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered sequence of keys and indices locating a value inside a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The empty path, which addresses the document root
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    /// Builder-style append of an object key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Builder-style append of an array index
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    /// Returns a new path with `segment` appended, leaving `self` untouched
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        JsonPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix of the first `len` segments, used in error reports
    fn prefix(&self, len: usize) -> JsonPath {
        JsonPath(self.0[..len].to_vec())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        JsonPath(iter.into_iter().map(Into::into).collect())
    }
}

/// Failure to resolve a [`JsonPath`] against a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path mismatch at '{at}': key '{key}' not found")]
    MissingKey { at: JsonPath, key: String },

    #[error("path mismatch at '{at}': index {index} out of bounds (length {len})")]
    IndexOutOfBounds {
        at: JsonPath,
        index: usize,
        len: usize,
    },

    #[error("path mismatch at '{at}': expected {expected}, found {found}")]
    TypeMismatch {
        at: JsonPath,
        expected: &'static str,
        found: &'static str,
    },
}

/// Short name of a JSON value's kind, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected_container(segment: &PathSegment) -> &'static str {
    match segment {
        PathSegment::Key(_) => "object",
        PathSegment::Index(_) => "array",
    }
}

/// Resolve `path` inside `root`
pub fn get_at_path<'a>(root: &'a Value, path: &JsonPath) -> Result<&'a Value, PathError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => {
                map.get(key).ok_or_else(|| PathError::MissingKey {
                    at: path.prefix(depth),
                    key: key.clone(),
                })?
            }
            (PathSegment::Index(index), Value::Array(items)) => {
                items
                    .get(*index)
                    .ok_or_else(|| PathError::IndexOutOfBounds {
                        at: path.prefix(depth),
                        index: *index,
                        len: items.len(),
                    })?
            }
            (segment, other) => {
                return Err(PathError::TypeMismatch {
                    at: path.prefix(depth),
                    expected: expected_container(segment),
                    found: kind_of(other),
                });
            }
        };
    }
    Ok(current)
}

/// Resolve `path` inside `root` for mutation
pub fn get_at_path_mut<'a>(
    root: &'a mut Value,
    path: &JsonPath,
) -> Result<&'a mut Value, PathError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => {
                map.get_mut(key).ok_or_else(|| PathError::MissingKey {
                    at: path.prefix(depth),
                    key: key.clone(),
                })?
            }
            (PathSegment::Index(index), Value::Array(items)) => {
                let len = items.len();
                items
                    .get_mut(*index)
                    .ok_or_else(|| PathError::IndexOutOfBounds {
                        at: path.prefix(depth),
                        index: *index,
                        len,
                    })?
            }
            (segment, other) => {
                return Err(PathError::TypeMismatch {
                    at: path.prefix(depth),
                    expected: expected_container(segment),
                    found: kind_of(other),
                });
            }
        };
    }
    Ok(current)
}

/// Write `value` at `path`, returning the value it replaced
///
/// The parent container must already exist. A missing final key is inserted
/// into its object (at the end, preserving the order of existing keys); a
/// final index must be within the array's bounds. The empty path replaces
/// the root.
pub fn set_at_path(
    root: &mut Value,
    path: &JsonPath,
    value: Value,
) -> Result<Option<Value>, PathError> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Ok(Some(std::mem::replace(root, value)));
    };
    let parent_path = JsonPath(parents.to_vec());
    let parent = get_at_path_mut(root, &parent_path)?;

    match (last, parent) {
        (PathSegment::Key(key), Value::Object(map)) => Ok(map.insert(key.clone(), value)),
        (PathSegment::Index(index), Value::Array(items)) => {
            let len = items.len();
            let slot = items
                .get_mut(*index)
                .ok_or_else(|| PathError::IndexOutOfBounds {
                    at: parent_path.clone(),
                    index: *index,
                    len,
                })?;
            Ok(Some(std::mem::replace(slot, value)))
        }
        (segment, other) => Err(PathError::TypeMismatch {
            at: parent_path.clone(),
            expected: expected_container(segment),
            found: kind_of(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "タイトル",
            "chapters": [
                {"name": "第一章", "lines": ["はじめ", "おわり"]},
                {"name": "第二章"}
            ],
            "count": 2
        })
    }

    #[test]
    fn test_get_nested_key_and_index() {
        let doc = sample();
        let path = JsonPath::new().key("chapters").index(0).key("lines").index(1);
        assert_eq!(get_at_path(&doc, &path).unwrap(), &json!("おわり"));
    }

    #[test]
    fn test_empty_path_is_root() {
        let doc = sample();
        assert_eq!(get_at_path(&doc, &JsonPath::new()).unwrap(), &doc);
    }

    #[test]
    fn test_set_then_get_round_trip_leaves_siblings() {
        let mut doc = sample();
        let path = JsonPath::new().key("chapters").index(1).key("name");

        let old = set_at_path(&mut doc, &path, json!("Chapter Two")).unwrap();
        assert_eq!(old, Some(json!("第二章")));
        assert_eq!(get_at_path(&doc, &path).unwrap(), &json!("Chapter Two"));

        // Siblings untouched
        assert_eq!(doc["title"], json!("タイトル"));
        assert_eq!(doc["count"], json!(2));
        assert_eq!(doc["chapters"][0]["name"], json!("第一章"));
    }

    #[test]
    fn test_set_preserves_key_order() {
        let mut doc = json!({"a": "あ", "b": "い", "c": "う"});
        set_at_path(&mut doc, &JsonPath::new().key("b"), json!("i")).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_set_root() {
        let mut doc = json!("古い");
        set_at_path(&mut doc, &JsonPath::new(), json!("new")).unwrap();
        assert_eq!(doc, json!("new"));
    }

    #[test]
    fn test_missing_key_reports_location() {
        let doc = sample();
        let path = JsonPath::new().key("chapters").index(0).key("missing");
        match get_at_path(&doc, &path) {
            Err(PathError::MissingKey { at, key }) => {
                assert_eq!(at.to_string(), "chapters -> 0");
                assert_eq!(key, "missing");
            }
            other => panic!("Expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn test_index_out_of_bounds() {
        let mut doc = sample();
        let path = JsonPath::new().key("chapters").index(5);
        let err = set_at_path(&mut doc, &path, json!("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfBounds {
                at: JsonPath::new().key("chapters"),
                index: 5,
                len: 2
            }
        );
        assert!(err.to_string().contains("path mismatch"));
    }

    #[test]
    fn test_type_mismatch() {
        let doc = sample();
        let path = JsonPath::new().key("title").index(0);
        match get_at_path(&doc, &path) {
            Err(PathError::TypeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "array");
                assert_eq!(found, "string");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_display_and_collect() {
        let path: JsonPath = vec![
            PathSegment::from("a"),
            PathSegment::from(3usize),
            PathSegment::from("b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(path.to_string(), "a -> 3 -> b");
        assert_eq!(JsonPath::new().to_string(), "(root)");
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = JsonPath::new().key("a");
        let child = parent.child(0usize);
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }
}
