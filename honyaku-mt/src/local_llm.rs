//! OpenAI-compatible chat-completion provider for a locally hosted model
//!
//! Talks to servers such as LM Studio or llama.cpp that expose
//! `POST /v1/chat/completions`. Requests are non-streaming with a fixed low
//! temperature; the first choice's message content is cleaned with
//! [`clean_completion`] before it is returned.
//!
//! # Example
//!
//! ```ignore
//! use honyaku_mt::{LocalLlmProvider, ProviderConfig, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig {
//!         history_limit: 2,
//!         ..ProviderConfig::default()
//!     };
//!     let mut provider = LocalLlmProvider::new(config)?;
//!     println!("{}", provider.translate("おはよう").await?);
//!     Ok(())
//! }
//! ```

use crate::chat::{ChatHistory, ChatTurn};
use crate::config::ProviderConfig;
use crate::error::{MtError, MtResult};
use crate::translator::{Translator, clean_completion};
use async_trait::async_trait;
use serde::Serialize;

/// Sampling temperature sent with every request
pub const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f64,
    stream: bool,
}

/// Chat-completion client with an optional bounded conversation window
pub struct LocalLlmProvider {
    config: ProviderConfig,
    client: reqwest::Client,
    history: ChatHistory,
}

impl LocalLlmProvider {
    /// Create a provider after validating `config`
    pub fn new(config: ProviderConfig) -> MtResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        let history = ChatHistory::new(config.history_limit);
        Ok(Self {
            config,
            client,
            history,
        })
    }

    /// Create a provider from `HONYAKU_*` environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::new(ProviderConfig::from_env()?)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    fn build_messages(&self, text: &str) -> Vec<ChatTurn> {
        let mut messages = self.history.recent().to_vec();
        messages.push(ChatTurn::user(text));
        messages
    }

    async fn request_completion(&self, messages: &[ChatTurn]) -> MtResult<String> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: TEMPERATURE,
            stream: false,
        };

        tracing::debug!(
            endpoint = %self.config.endpoint,
            turns = messages.len(),
            "sending completion request"
        );
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::TranslationError(format!(
                "Endpoint returned {}: {}",
                status, error_text
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                MtError::InvalidResponse(
                    "missing 'choices[0].message.content' in completion response".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for LocalLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLlmProvider")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("history_turns", &self.history.len())
            .finish()
    }
}

#[async_trait]
impl Translator for LocalLlmProvider {
    async fn translate(&mut self, text: &str) -> MtResult<String> {
        let messages = self.build_messages(text);
        let raw = self.request_completion(&messages).await?;
        let cleaned = clean_completion(&raw, self.config.flatten);

        self.history.record_exchange(text, &cleaned);
        Ok(cleaned)
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }

    fn provider_name(&self) -> &str {
        "Local LLM"
    }
}
