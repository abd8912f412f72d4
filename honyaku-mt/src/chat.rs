//! Chat turns exchanged with a completion endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Conversation so far, owned by a single provider
///
/// Holds at most `limit` user/assistant pairs; older pairs are dropped as new
/// ones are recorded. A limit of zero keeps no history at all. Turns are only
/// ever recorded in pairs, after a successful exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    limit: usize,
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            turns: Vec::new(),
        }
    }

    /// Maximum number of exchanges kept
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Everything kept, oldest first; at most `2 * limit` turns
    pub fn recent(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Append a completed request/response pair, evicting the oldest pairs
    pub fn record_exchange(&mut self, request: &str, response: &str) {
        if self.limit == 0 {
            return;
        }
        self.turns.push(ChatTurn::user(request));
        self.turns.push(ChatTurn::assistant(response));

        let max_turns = self.limit.saturating_mul(2);
        if self.turns.len() > max_turns {
            let excess = self.turns.len() - max_turns;
            self.turns.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}
