//! Mock translator for testing
//!
//! Deterministic, network-free stand-in for a completion endpoint. It runs
//! the review loop in tests and backs the `--mock` flag of the binaries.
//!
//! # Example
//!
//! ```ignore
//! use honyaku_mt::{MockMode, MockTranslator, Translator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mut mock = MockTranslator::new(MockMode::Fixed("Hello".to_string()));
//!     assert_eq!(mock.translate("こんにちは").await.unwrap(), "Hello");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::Translator;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Always answer with the same text
    Fixed(String),

    /// Look up the source text; unknown text is tagged as `[mt] text`
    Mappings(HashMap<String, String>),

    /// Answer with each scripted result in turn; an exhausted script fails
    Sequence(VecDeque<Result<String, String>>),

    /// Prefix the source with `[mt] `
    Tagged,

    /// Simulate backend errors
    Error(String),
}

/// Mock translator that records what it was asked to translate
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    requests: Vec<String>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            requests: Vec::new(),
        }
    }

    /// Scripted successes and failures, consumed one per call
    pub fn sequence<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<String, String>>,
    {
        Self::new(MockMode::Sequence(results.into_iter().collect()))
    }

    /// Every text passed to `translate`, in call order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    fn apply_translation(&mut self, text: &str) -> MtResult<String> {
        match &mut self.mode {
            MockMode::Fixed(answer) => Ok(answer.clone()),
            MockMode::Mappings(map) => Ok(map
                .get(text)
                .cloned()
                .unwrap_or_else(|| format!("[mt] {}", text))),
            MockMode::Sequence(script) => match script.pop_front() {
                Some(Ok(answer)) => Ok(answer),
                Some(Err(msg)) => Err(MtError::TranslationError(msg)),
                None => Err(MtError::TranslationError(
                    "mock script exhausted".to_string(),
                )),
            },
            MockMode::Tagged => Ok(format!("[mt] {}", text)),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&mut self, text: &str) -> MtResult<String> {
        self.requests.push(text.to_string());
        self.apply_translation(text)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
