//! Loading and whole-file persistence of JSON documents

use crate::error::{HonyakuError, Result};
use crate::value_path::{JsonPath, get_at_path, set_at_path};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read and parse a JSON file
pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| HonyakuError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| HonyakuError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty-printed JSON and replace `path` with it
///
/// The text is written to a temporary file next to `path` and renamed over
/// it, so readers never observe a half-written document.
pub fn write_json_pretty(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(HonyakuError::Serialize)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HonyakuError::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(text.as_bytes())
        .map_err(|e| HonyakuError::io(&tmp_path, e))?;
    tmp.persist(path)
        .map_err(|e| HonyakuError::io(path, e.error))?;
    Ok(())
}

/// A JSON document loaded once and written back as a whole
///
/// The in-memory value is the single source of truth while a review runs;
/// [`JsonDocument::persist`] always serializes the full current state.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
    root: Value,
}

impl JsonDocument {
    /// Load the document at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = read_json(&path)?;
        Ok(Self { path, root })
    }

    /// Wrap an in-memory value that will be persisted to `path`
    pub fn from_value(path: impl Into<PathBuf>, root: Value) -> Self {
        Self {
            path: path.into(),
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &JsonPath) -> Result<&Value> {
        Ok(get_at_path(&self.root, path)?)
    }

    /// Replace the string at `path` in memory only
    pub fn set_string(&mut self, path: &JsonPath, text: &str) -> Result<()> {
        set_at_path(&mut self.root, path, Value::String(text.to_string()))?;
        Ok(())
    }

    /// Write the whole document back to its file
    pub fn persist(&self) -> Result<()> {
        write_json_pretty(&self.path, &self.root)?;
        tracing::debug!(path = %self.path.display(), "persisted document");
        Ok(())
    }
}
