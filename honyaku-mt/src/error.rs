/// Error types for the translation and review module
#[derive(Debug, thiserror::Error)]
pub enum MtError {
    /// Invalid or missing provider configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure talking to the completion endpoint
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The endpoint answered but produced no usable translation
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// The endpoint answered with a payload of the wrong shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The file to review does not exist
    #[error("File '{}' not found.", .0.display())]
    InputNotFound(std::path::PathBuf),
    /// Console or file I/O failure during review
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Loading, mutating or persisting the document failed
    #[error(transparent)]
    Document(#[from] honyaku::HonyakuError),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
