//! Translation provider trait and output normalization
//!
//! The review loop talks to a [`Translator`] rather than to a concrete HTTP
//! client, so the same loop runs against the local completion endpoint
//! ([`LocalLlmProvider`](crate::local_llm::LocalLlmProvider)) or a
//! deterministic [`MockTranslator`](crate::mock::MockTranslator).
//!
//! # Example
//!
//! ```ignore
//! use honyaku_mt::{LocalLlmProvider, ProviderConfig, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut provider = LocalLlmProvider::new(ProviderConfig::from_env()?)?;
//!     let result = provider.translate("こんにちは").await?;
//!     println!("{}", result); // "Hello"
//!     Ok(())
//! }
//! ```

use crate::error::MtResult;
use async_trait::async_trait;

/// A text-in, text-out translation backend
///
/// Implementations never panic on backend faults: every transport or parse
/// problem comes back as an [`MtError`](crate::error::MtError), and the caller
/// decides whether to retry, skip or stop.
#[async_trait]
pub trait Translator: Send {
    /// Translate one block of text
    ///
    /// Providers that keep a conversation record the exchange only when the
    /// call succeeds.
    async fn translate(&mut self, text: &str) -> MtResult<String>;

    /// Forget any conversation context; a no-op for stateless providers
    fn clear_history(&mut self) {}

    /// Name used in logs
    fn provider_name(&self) -> &str;
}

/// Normalize raw completion text
///
/// Leading and trailing whitespace is always trimmed. With `flatten`, line
/// breaks become spaces and runs of spaces collapse to one, giving a single
/// line that fits the game's text fields.
pub fn clean_completion(raw: &str, flatten: bool) -> String {
    let trimmed = raw.trim();
    if !flatten {
        return trimmed.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut previous_space = false;
    for c in trimmed.chars() {
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        out.push(c);
    }
    out
}
