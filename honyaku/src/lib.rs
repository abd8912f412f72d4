//! Localization helpers for game data trees
//!
//! This crate holds the synchronous core shared by the honyaku tools:
//!
//! 1. **Tree diff** - key-level diff of nested JSON mappings against an
//!    already-translated reference ([`tree`])
//! 2. **Reconciler** - stages raw files and structured-data diffs that the
//!    reference corpus does not cover yet ([`reconcile`])
//! 3. **Harvester** - finds strings that still contain Japanese text, with
//!    the path that locates them ([`harvest`])
//! 4. **Paths and documents** - path-based reads and writes into JSON values
//!    and whole-document persistence ([`value_path`], [`document`])
//!
//! # Example
//!
//! ```
//! use honyaku::{harvest, set_at_path};
//! use serde_json::json;
//!
//! let mut doc = json!({"a": "normal", "b": "日本語", "c": {"d": "テスト"}});
//! let entries = harvest(&doc);
//! assert_eq!(entries.len(), 2);
//!
//! set_at_path(&mut doc, &entries[0].path, json!("Japanese")).unwrap();
//! assert_eq!(doc["b"], "Japanese");
//! ```

pub mod document;
pub mod error;
pub mod harvest;
pub mod reconcile;
pub mod tree;
pub mod value_path;

// Re-export main types for convenient access
pub use document::{JsonDocument, read_json, write_json_pretty};
pub use error::{HonyakuError, Result};
pub use harvest::{PathEntry, harvest, harvest_from, needs_translation};
pub use reconcile::{
    ReconcileLayout, ReconcileReport, StructuredFileReport, StructuredOutcome, diff_structured,
    generate_diff, reconcile, stage_missing,
};
pub use tree::{KeyTree, count_leaves, diff_tree, diff_value};
pub use value_path::{JsonPath, PathError, PathSegment, get_at_path, get_at_path_mut, set_at_path};
