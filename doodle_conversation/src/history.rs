//! Resubmission window over a stored conversation.
//!
//! Stored histories grow for the whole game; only the window selected here is
//! sent back to the model on each turn.

use doodle_core::ChatMessage;

/// Configuration for the resubmitted history window.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of stored messages sent per turn, system prompt included
    pub max_messages: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_messages: 40 }
    }
}

impl HistoryConfig {
    /// Create a config with specific message limit.
    #[must_use]
    pub const fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }
}

/// A sliding window over conversation history.
///
/// The first message (the persona system prompt) is always kept; the rest of
/// the budget goes to the most recent messages.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    config: HistoryConfig,
}

impl HistoryWindow {
    /// Create with custom config.
    #[must_use]
    pub const fn with_config(config: HistoryConfig) -> Self {
        Self { config }
    }

    /// Select messages to include in context.
    #[must_use]
    pub fn select_messages(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let Some((first, rest)) = messages.split_first() else {
            return Vec::new();
        };

        let budget = self.config.max_messages.max(1) - 1;
        let start = rest.len().saturating_sub(budget);

        let mut selected = Vec::with_capacity(1 + rest.len() - start);
        selected.push(first.clone());
        selected.extend_from_slice(&rest[start..]);
        selected
    }

    /// Number of stored messages a window over `len` messages leaves out.
    #[must_use]
    pub fn trimmed_count(&self, len: usize) -> usize {
        len.saturating_sub(self.config.max_messages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_core::Role;

    fn create_test_messages(count: usize) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system("persona")];
        messages.extend((1..count).map(|i| ChatMessage {
            role: if i % 2 == 0 {
                Role::Assistant
            } else {
                Role::System
            },
            content: format!("Message {i}"),
        }));
        messages
    }

    #[test]
    fn test_history_window_select() {
        let window = HistoryWindow::with_config(HistoryConfig::default().with_max_messages(5));
        let messages = create_test_messages(20);

        let selected = window.select_messages(&messages);

        // First message + last 4
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[0].content, "persona");
        assert_eq!(selected[1].content, "Message 16");
        assert_eq!(selected[4].content, "Message 19");
        assert_eq!(window.trimmed_count(messages.len()), 15);
    }

    #[test]
    fn short_history_is_untouched() {
        let window = HistoryWindow::default();
        let messages = create_test_messages(3);
        assert_eq!(window.select_messages(&messages), messages);
        assert_eq!(window.trimmed_count(messages.len()), 0);
    }

    #[test]
    fn tiny_window_keeps_system_prompt() {
        let window = HistoryWindow::with_config(HistoryConfig::default().with_max_messages(0));
        let selected = window.select_messages(&create_test_messages(6));
        assert_eq!(selected, vec![ChatMessage::system("persona")]);
        assert!(window.select_messages(&[]).is_empty());
    }
}
