//! Per-game conversation history.

use doodle_core::{ChatMessage, Role};

/// Ordered turns for one game id.
///
/// The first entry is always the seeded system prompt; entries are only ever
/// appended after it.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    /// Create a history holding only the system prompt.
    #[must_use]
    pub fn seeded(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Add a message to the history.
    pub fn add_message(&mut self, role: Role, content: String) {
        self.messages.push(ChatMessage { role, content });
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }
}
