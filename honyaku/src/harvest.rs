//! Collect strings that still need translation from a JSON document
//!
//! A string qualifies when it contains at least one Hiragana, Katakana or Han
//! character. Traversal is depth-first and pre-order: object keys in document
//! order, array elements by index, so repeated runs over the same document
//! yield the same sequence of entries.

use crate::value_path::{JsonPath, PathSegment};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static SOURCE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Hiragana}\p{Katakana}\p{Han}]").expect("script class pattern is valid")
});

/// A qualifying string and the path that locates it in its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: JsonPath,
    pub value: String,
}

/// Whether `text` contains source-script characters
pub fn needs_translation(text: &str) -> bool {
    !text.is_empty() && SOURCE_SCRIPT.is_match(text)
}

/// Harvest every qualifying string leaf under `value`
pub fn harvest(value: &Value) -> Vec<PathEntry> {
    harvest_from(value, &JsonPath::new())
}

/// Harvest under `value`, prefixing every produced path with `prefix`
pub fn harvest_from(value: &Value, prefix: &JsonPath) -> Vec<PathEntry> {
    let mut entries = Vec::new();
    collect(value, prefix, &mut entries);
    entries
}

fn collect(value: &Value, path: &JsonPath, entries: &mut Vec<PathEntry>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect(child, &path.child(PathSegment::Key(key.clone())), entries);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect(child, &path.child(PathSegment::Index(index)), entries);
            }
        }
        Value::String(text) if needs_translation(text) => {
            entries.push(PathEntry {
                path: path.clone(),
                value: text.clone(),
            });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_path::{get_at_path, set_at_path};
    use serde_json::json;

    #[test]
    fn test_needs_translation_scripts() {
        assert!(needs_translation("ひらがな"));
        assert!(needs_translation("カタカナ"));
        assert!(needs_translation("漢字"));
        assert!(needs_translation("Lv.5 スキル"));
        assert!(needs_translation("ｶﾀｶﾅ"));
    }

    #[test]
    fn test_needs_translation_rejects_other_text() {
        assert!(!needs_translation(""));
        assert!(!needs_translation("hello"));
        assert!(!needs_translation("café"));
        assert!(!needs_translation("한국어"));
        assert!(!needs_translation("12345 !?"));
    }

    #[test]
    fn test_harvest_basic_document() {
        let doc = json!({"a": "normal", "b": "日本語", "c": {"d": "テスト"}});
        let entries = harvest(&doc);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, JsonPath::new().key("b"));
        assert_eq!(entries[0].value, "日本語");
        assert_eq!(entries[1].path, JsonPath::new().key("c").key("d"));
        assert_eq!(entries[1].value, "テスト");
    }

    #[test]
    fn test_harvest_arrays_and_non_strings() {
        let doc = json!({
            "lines": ["hello", "こんにちは", {"speaker": "トレーナー", "id": 7}],
            "enabled": true,
            "none": null
        });
        let paths: Vec<String> = harvest(&doc).iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["lines -> 1", "lines -> 2 -> speaker"]);
    }

    #[test]
    fn test_harvest_is_preorder_and_stable() {
        let doc = json!({
            "z": "最初",
            "a": {"inner": "二番"},
            "m": ["三番"]
        });
        let first = harvest(&doc);
        let second = harvest(&doc);
        assert_eq!(first, second);

        let values: Vec<&str> = first.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["最初", "二番", "三番"]);
    }

    #[test]
    fn test_harvest_top_level_string() {
        let entries = harvest(&json!("単独"));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.is_empty());
    }

    #[test]
    fn test_harvest_from_prefix() {
        let doc = json!({"x": "文字"});
        let entries = harvest_from(&doc, &JsonPath::new().key("root"));
        assert_eq!(entries[0].path, JsonPath::new().key("root").key("x"));
    }

    #[test]
    fn test_harvested_paths_round_trip() {
        let mut doc = json!({
            "title": "題名",
            "list": [{"a": "一"}, "plain", "二"],
            "meta": {"note": "memo", "tag": "札"}
        });
        let original = doc.clone();

        for (i, entry) in harvest(&original).iter().enumerate() {
            let replacement = json!(format!("translated-{}", i));
            set_at_path(&mut doc, &entry.path, replacement.clone()).unwrap();
            assert_eq!(get_at_path(&doc, &entry.path).unwrap(), &replacement);
        }

        // Non-qualifying siblings untouched
        assert_eq!(doc["list"][1], json!("plain"));
        assert_eq!(doc["meta"]["note"], json!("memo"));
        assert!(harvest(&doc).is_empty());
    }
}
