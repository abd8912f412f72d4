//! Error types for the honyaku core library

use std::path::PathBuf;

use crate::value_path::PathError;

/// Errors raised while reading, diffing or writing localization data
#[derive(Debug, thiserror::Error)]
pub enum HonyakuError {
    /// Filesystem failure, with the path that was being touched
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed
    #[error("Failed to parse JSON from '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON value could not be serialized back to text
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Walking a directory tree failed
    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A path did not resolve inside a document
    #[error(transparent)]
    Path(#[from] PathError),
}

impl HonyakuError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HonyakuError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for honyaku operations
pub type Result<T> = std::result::Result<T, HonyakuError>;
