//! Machine-translation review for honyaku documents
//!
//! This crate sends untranslated strings to a locally hosted language model
//! and lets an operator accept, edit, regenerate or skip each suggestion,
//! writing accepted text back into the source JSON document.
//!
//! # Workflow Example
//!
//! ```ignore
//! use honyaku::{JsonDocument, harvest};
//! use honyaku_mt::{LineOperator, LocalLlmProvider, ReviewSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Load the document and find strings that still need translation
//!     let document = JsonDocument::open("diff/mdb/text_data.json")?;
//!     let entries = harvest(document.root());
//!
//!     // 2. Review them one by one against the local model
//!     let provider = LocalLlmProvider::from_env()?;
//!     let operator = LineOperator::new(std::io::stdin().lock());
//!     let mut session = ReviewSession::new(document, provider, operator, std::io::stdout());
//!     let summary = session.run(&entries).await?;
//!
//!     println!("{} translated", summary.translated);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod local_llm;
pub mod mock;
pub mod review;
pub mod terminal;
pub mod translator;


// Re-export main types for convenient access
pub use chat::{ChatHistory, ChatRole, ChatTurn};
pub use config::ProviderConfig;
pub use error::{MtError, MtResult};
pub use local_llm::LocalLlmProvider;
pub use mock::{MockMode, MockTranslator};
pub use review::{
    Command, ItemOutcome, LineOperator, Operator, ReviewInput, ReviewSession, ReviewSummary,
    load_review_input,
};
pub use terminal::{LineBuffer, TerminalOperator};
pub use translator::{Translator, clean_completion};
