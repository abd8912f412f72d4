//! Stage raw game data that the reference corpus does not cover yet
//!
//! Three parallel trees are involved:
//!
//! - `raw`: freshly extracted data
//! - `reference`: the already-translated corpus
//! - `diff`: output, created on demand
//!
//! Plain files are compared by existence only. Some top-level folders are laid
//! out with an extra `data` directory in the reference tree, so
//! `home/foo.json` in raw corresponds to `home/data/foo.json` in reference.
//!
//! The structured-data folder (`mdb`) is handled separately: each raw file is
//! matched to its reference counterpart through a fixed filename table and
//! diffed key by key with [`diff_tree`](crate::tree::diff_tree).

use crate::document::{read_json, write_json_pretty};
use crate::error::{HonyakuError, Result};
use crate::tree::{count_leaves, diff_value};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Top-level folders that gain a `data` directory in the reference tree
pub const DEFAULT_RELOCATED_FOLDERS: [&str; 2] = ["home", "story"];

/// Segment inserted after a relocated folder name
pub const DEFAULT_DATA_SEGMENT: &str = "data";

/// Folder holding structured key-value files
pub const DEFAULT_STRUCTURED_FOLDER: &str = "mdb";

/// Raw structured-data filename to reference filename
pub const DEFAULT_STRUCTURED_MAPPING: [(&str, &str); 5] = [
    (
        "character_system_text.json",
        "character_system_text_dict.json",
    ),
    ("text_data.json", "text_data_dict.json"),
    ("text_data_dict.json", "text_data_dict.json"),
    ("race_jikkyo_comment.json", "race_jikkyo_comment.json"),
    ("race_jikkyo_message.json", "race_jikkyo_message.json"),
];

/// Where the three trees live and how raw paths map onto the reference tree
#[derive(Debug, Clone)]
pub struct ReconcileLayout {
    pub raw_root: PathBuf,
    pub reference_root: PathBuf,
    pub diff_root: PathBuf,
    pub relocated_folders: BTreeSet<String>,
    pub data_segment: String,
    pub structured_folder: String,
    pub structured_mapping: BTreeMap<String, String>,
}

impl ReconcileLayout {
    /// Layout with explicit roots and the default folder rules
    pub fn new(
        raw_root: impl Into<PathBuf>,
        reference_root: impl Into<PathBuf>,
        diff_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            raw_root: raw_root.into(),
            reference_root: reference_root.into(),
            diff_root: diff_root.into(),
            relocated_folders: DEFAULT_RELOCATED_FOLDERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data_segment: DEFAULT_DATA_SEGMENT.to_string(),
            structured_folder: DEFAULT_STRUCTURED_FOLDER.to_string(),
            structured_mapping: DEFAULT_STRUCTURED_MAPPING
                .iter()
                .map(|(raw, reference)| (raw.to_string(), reference.to_string()))
                .collect(),
        }
    }

    /// `raw/`, `reference/` and `diff/` under a common base directory
    pub fn from_base(base: &Path) -> Self {
        Self::new(
            base.join("raw"),
            base.join("reference"),
            base.join("diff"),
        )
    }

    /// Map a raw-relative path to its reference-relative counterpart
    ///
    /// ```
    /// use honyaku::reconcile::ReconcileLayout;
    /// use std::path::{Path, PathBuf};
    ///
    /// let layout = ReconcileLayout::from_base(Path::new("work"));
    /// assert_eq!(
    ///     layout.reference_path_for(Path::new("home/foo.json")),
    ///     PathBuf::from("home/data/foo.json")
    /// );
    /// assert_eq!(
    ///     layout.reference_path_for(Path::new("battle/bar.json")),
    ///     PathBuf::from("battle/bar.json")
    /// );
    /// ```
    pub fn reference_path_for(&self, raw_relative: &Path) -> PathBuf {
        let mut components = raw_relative.components();
        let first = components.next();
        let rest = components.as_path();

        match first {
            Some(Component::Normal(folder))
                if !rest.as_os_str().is_empty()
                    && folder
                        .to_str()
                        .is_some_and(|name| self.relocated_folders.contains(name)) =>
            {
                Path::new(folder).join(&self.data_segment).join(rest)
            }
            _ => raw_relative.to_path_buf(),
        }
    }

    /// Reference filename for a structured-data file, if it is mapped
    pub fn reference_file_for(&self, raw_filename: &str) -> Option<&str> {
        self.structured_mapping.get(raw_filename).map(String::as_str)
    }

    fn is_structured(&self, raw_relative: &Path) -> bool {
        matches!(
            raw_relative.components().next(),
            Some(Component::Normal(first)) if first == self.structured_folder.as_str()
        )
    }
}

/// Dotfiles and dot-directories, `.gitkeep` placeholders included
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Raw-relative paths of plain files with no counterpart in the reference tree
///
/// The structured-data folder, marker files and anything hidden (dotfiles and
/// the contents of dot-directories) are not considered.
pub fn reconcile(layout: &ReconcileLayout) -> Result<BTreeSet<PathBuf>> {
    let mut missing = BTreeSet::new();
    if !layout.raw_root.is_dir() {
        tracing::warn!(raw = %layout.raw_root.display(), "raw directory does not exist");
        return Ok(missing);
    }

    let walker = WalkDir::new(&layout.raw_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));
    for entry in walker {
        let entry = entry.map_err(|source| HonyakuError::Walk {
            path: layout.raw_root.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&layout.raw_root) else {
            continue;
        };
        if layout.is_structured(relative) {
            continue;
        }

        let reference = layout
            .reference_root
            .join(layout.reference_path_for(relative));
        if !reference.exists() {
            tracing::debug!(file = %relative.display(), "missing from reference");
            missing.insert(relative.to_path_buf());
        }
    }
    Ok(missing)
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| HonyakuError::io(parent, e))?;
    }
    fs::copy(src, dest).map_err(|e| HonyakuError::io(src, e))?;
    Ok(())
}

/// Copy each raw-relative path verbatim into the diff tree
pub fn stage_missing<'a>(
    layout: &ReconcileLayout,
    missing: impl IntoIterator<Item = &'a PathBuf>,
) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for relative in missing {
        copy_file(
            &layout.raw_root.join(relative),
            &layout.diff_root.join(relative),
        )?;
        copied.push(relative.clone());
    }
    Ok(copied)
}

/// What happened to one structured-data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredOutcome {
    /// No entry in the filename table; nothing written
    Unmapped,
    /// Reference counterpart absent; raw file copied as-is
    CopiedWhole,
    /// Every key already exists in the reference
    NoNewKeys,
    /// Diff written with this many leaf entries
    Diffed { new_entries: usize },
    /// One side is not a JSON object, so there are no keys to compare
    NotAKeyTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredFileReport {
    pub file_name: String,
    pub outcome: StructuredOutcome,
}

/// Content-diff every `*.json` directly inside the raw structured-data folder
pub fn diff_structured(layout: &ReconcileLayout) -> Result<Vec<StructuredFileReport>> {
    let raw_dir = layout.raw_root.join(&layout.structured_folder);
    let ref_dir = layout.reference_root.join(&layout.structured_folder);
    let out_dir = layout.diff_root.join(&layout.structured_folder);

    if !raw_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut raw_files = Vec::new();
    for entry in fs::read_dir(&raw_dir).map_err(|e| HonyakuError::io(&raw_dir, e))? {
        let path = entry.map_err(|e| HonyakuError::io(&raw_dir, e))?.path();
        if path.is_file()
            && !is_hidden(&path)
            && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        {
            raw_files.push(path);
        }
    }
    raw_files.sort();

    let mut reports = Vec::new();
    for raw_file in raw_files {
        let Some(file_name) = raw_file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let outcome = diff_structured_file(layout, &raw_file, file_name, &ref_dir, &out_dir)?;
        reports.push(StructuredFileReport {
            file_name: file_name.to_string(),
            outcome,
        });
    }
    Ok(reports)
}

fn diff_structured_file(
    layout: &ReconcileLayout,
    raw_file: &Path,
    file_name: &str,
    ref_dir: &Path,
    out_dir: &Path,
) -> Result<StructuredOutcome> {
    let Some(ref_name) = layout.reference_file_for(file_name) else {
        tracing::warn!(file = file_name, "no reference mapping, skipping");
        return Ok(StructuredOutcome::Unmapped);
    };

    let ref_file = ref_dir.join(ref_name);
    let dest = out_dir.join(file_name);
    if !ref_file.exists() {
        copy_file(raw_file, &dest)?;
        return Ok(StructuredOutcome::CopiedWhole);
    }

    let raw_data = read_json(raw_file)?;
    let ref_data = read_json(&ref_file)?;

    let Some(diff) = diff_value(&raw_data, Some(&ref_data)) else {
        tracing::warn!(file = file_name, "structured file is not a key tree, skipping");
        return Ok(StructuredOutcome::NotAKeyTree);
    };

    if diff.is_empty() {
        return Ok(StructuredOutcome::NoNewKeys);
    }

    let new_entries = count_leaves(&diff);
    fs::create_dir_all(out_dir).map_err(|e| HonyakuError::io(out_dir, e))?;
    write_json_pretty(&dest, &Value::Object(diff))?;
    tracing::info!(file = file_name, new_entries, "wrote structured diff");
    Ok(StructuredOutcome::Diffed { new_entries })
}

/// Summary of a full reconcile run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Plain files copied into the diff tree, raw-relative
    pub copied_files: Vec<PathBuf>,
    pub structured: Vec<StructuredFileReport>,
}

/// Plain-file pass followed by the structured-data pass
pub fn generate_diff(layout: &ReconcileLayout) -> Result<ReconcileReport> {
    let missing = reconcile(layout)?;
    tracing::info!(count = missing.len(), "plain files missing from reference");
    let copied_files = stage_missing(layout, &missing)?;
    let structured = diff_structured(layout)?;
    Ok(ReconcileReport {
        copied_files,
        structured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn setup() -> (tempfile::TempDir, ReconcileLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = ReconcileLayout::from_base(dir.path());
        fs::create_dir_all(&layout.raw_root).unwrap();
        fs::create_dir_all(&layout.reference_root).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_reference_path_mapping() {
        let layout = ReconcileLayout::from_base(Path::new("base"));
        assert_eq!(
            layout.reference_path_for(Path::new("story/ch1/01.json")),
            PathBuf::from("story/data/ch1/01.json")
        );
        assert_eq!(
            layout.reference_path_for(Path::new("race/x.json")),
            PathBuf::from("race/x.json")
        );
        // A top-level file named like a relocated folder is not a folder
        assert_eq!(
            layout.reference_path_for(Path::new("home")),
            PathBuf::from("home")
        );
    }

    #[test]
    fn test_relocated_folder_requires_data_segment() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "home/foo.json", "{}");
        touch(&layout.raw_root, "battle/bar.json", "{}");

        // Verbatim home path does not count for a relocated folder
        touch(&layout.reference_root, "home/foo.json", "{}");
        touch(&layout.reference_root, "battle/bar.json", "{}");

        let missing = reconcile(&layout).unwrap();
        assert_eq!(
            missing.into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from("home/foo.json")]
        );

        touch(&layout.reference_root, "home/data/foo.json", "{}");
        assert!(reconcile(&layout).unwrap().is_empty());
    }

    #[test]
    fn test_non_relocated_folder_compares_verbatim() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "battle/bar.json", "{}");
        touch(&layout.reference_root, "battle/data/bar.json", "{}");

        let missing = reconcile(&layout).unwrap();
        assert!(missing.contains(Path::new("battle/bar.json")));
    }

    #[test]
    fn test_markers_and_structured_folder_are_skipped() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "home/.gitkeep", "");
        touch(&layout.raw_root, "mdb/text_data.json", "{}");
        touch(&layout.raw_root, "mdb/readme.txt", "x");

        assert!(reconcile(&layout).unwrap().is_empty());
    }

    #[test]
    fn test_hidden_files_and_directories_are_skipped() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "home/.DS_Store", "x");
        touch(&layout.raw_root, ".hidden/x.json", "{}");
        touch(&layout.raw_root, "battle/.cache", "x");
        touch(&layout.raw_root, "battle/.tmp/y.json", "{}");
        touch(&layout.raw_root, "mdb/.text_data.json", r#"{"1": "隠し"}"#);

        assert!(reconcile(&layout).unwrap().is_empty());
        assert!(diff_structured(&layout).unwrap().is_empty());

        touch(&layout.raw_root, "battle/visible.json", "{}");
        assert_eq!(
            reconcile(&layout).unwrap().into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from("battle/visible.json")]
        );
    }

    #[test]
    fn test_generate_diff_copies_plain_files_byte_for_byte() {
        let (_dir, layout) = setup();
        let content = "{\"a\":  \"ほげ\"}\n";
        touch(&layout.raw_root, "story/ch2/02.json", content);
        touch(&layout.raw_root, "home/existing.json", "{}");
        touch(&layout.reference_root, "home/data/existing.json", "{}");

        let report = generate_diff(&layout).unwrap();
        assert_eq!(report.copied_files, vec![PathBuf::from("story/ch2/02.json")]);

        let copied = fs::read_to_string(layout.diff_root.join("story/ch2/02.json")).unwrap();
        assert_eq!(copied, content);
        assert!(!layout.diff_root.join("home").exists());
    }

    #[test]
    fn test_structured_unmapped_file_is_skipped() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "mdb/unknown.json", r#"{"1": "新"}"#);

        let reports = diff_structured(&layout).unwrap();
        assert_eq!(
            reports,
            vec![StructuredFileReport {
                file_name: "unknown.json".to_string(),
                outcome: StructuredOutcome::Unmapped,
            }]
        );
        assert!(!layout.diff_root.join("mdb/unknown.json").exists());
    }

    #[test]
    fn test_structured_without_reference_copies_whole_file() {
        let (_dir, layout) = setup();
        let content = r#"{"6": {"1001": "新しい"}}"#;
        touch(&layout.raw_root, "mdb/race_jikkyo_comment.json", content);

        let reports = diff_structured(&layout).unwrap();
        assert_eq!(reports[0].outcome, StructuredOutcome::CopiedWhole);
        let copied =
            fs::read_to_string(layout.diff_root.join("mdb/race_jikkyo_comment.json")).unwrap();
        assert_eq!(copied, content);
    }

    #[test]
    fn test_structured_diff_uses_mapped_reference_name() {
        let (_dir, layout) = setup();
        touch(
            &layout.raw_root,
            "mdb/text_data.json",
            r#"{"6": {"1001": "既訳", "1002": "未訳"}, "47": {"1": "新規"}}"#,
        );
        touch(
            &layout.reference_root,
            "mdb/text_data_dict.json",
            r#"{"6": {"1001": "Translated"}}"#,
        );

        let reports = diff_structured(&layout).unwrap();
        assert_eq!(
            reports[0].outcome,
            StructuredOutcome::Diffed { new_entries: 2 }
        );

        let written = read_json(&layout.diff_root.join("mdb/text_data.json")).unwrap();
        assert_eq!(written, json!({"6": {"1002": "未訳"}, "47": {"1": "新規"}}));
    }

    #[test]
    fn test_structured_no_new_keys_writes_nothing() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "mdb/text_data.json", r#"{"6": {"1001": "既訳"}}"#);
        touch(
            &layout.reference_root,
            "mdb/text_data_dict.json",
            r#"{"6": {"1001": "Done"}}"#,
        );

        let reports = diff_structured(&layout).unwrap();
        assert_eq!(reports[0].outcome, StructuredOutcome::NoNewKeys);
        assert!(!layout.diff_root.join("mdb").exists());
    }

    #[test]
    fn test_structured_non_object_is_reported() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "mdb/text_data.json", r#"["一", "二"]"#);
        touch(&layout.reference_root, "mdb/text_data_dict.json", "{}");

        let reports = diff_structured(&layout).unwrap();
        assert_eq!(reports[0].outcome, StructuredOutcome::NotAKeyTree);
    }

    #[test]
    fn test_structured_malformed_reference_is_an_error() {
        let (_dir, layout) = setup();
        touch(&layout.raw_root, "mdb/text_data.json", "{}");
        touch(&layout.reference_root, "mdb/text_data_dict.json", "{ broken");

        assert!(matches!(
            diff_structured(&layout),
            Err(HonyakuError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_raw_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ReconcileLayout::from_base(&dir.path().join("nowhere"));
        let report = generate_diff(&layout).unwrap();
        assert_eq!(report, ReconcileReport::default());
    }
}
