//! Settings for the local chat-completion provider

use crate::error::{MtError, MtResult};
use std::time::Duration;

pub const ENDPOINT_VAR: &str = "HONYAKU_ENDPOINT";
pub const MODEL_VAR: &str = "HONYAKU_MODEL";
pub const HISTORY_VAR: &str = "HONYAKU_HISTORY";
pub const FLATTEN_VAR: &str = "HONYAKU_FLATTEN";
pub const TIMEOUT_VAR: &str = "HONYAKU_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// How to reach the completion endpoint and how to post-process its output
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Full URL of the chat-completions route
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Number of previous exchanges sent as context; 0 makes every call independent
    pub history_limit: usize,
    /// Collapse multi-line output onto a single line
    pub flatten: bool,
    /// Upper bound on a single request, including reading the response
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            history_limit: 0,
            flatten: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by `HONYAKU_*` environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MtResult<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(model) = lookup(MODEL_VAR) {
            config.model = model;
        }
        if let Some(history) = lookup(HISTORY_VAR) {
            config.history_limit = history.trim().parse().map_err(|_| {
                MtError::ConfigError(format!(
                    "{} must be a non-negative integer, got '{}'",
                    HISTORY_VAR, history
                ))
            })?;
        }
        if let Some(flatten) = lookup(FLATTEN_VAR) {
            config.flatten = parse_bool(&flatten).ok_or_else(|| {
                MtError::ConfigError(format!(
                    "{} must be true or false, got '{}'",
                    FLATTEN_VAR, flatten
                ))
            })?;
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                MtError::ConfigError(format!(
                    "{} must be a number of seconds, got '{}'",
                    TIMEOUT_VAR, timeout
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is an http(s) URL and the model is named
    pub fn validate(&self) -> MtResult<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            MtError::ConfigError(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(MtError::ConfigError(format!(
                "Endpoint must use http or https: {}",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(MtError::ConfigError("Model name cannot be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(MtError::ConfigError("Timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
