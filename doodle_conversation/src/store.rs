//! Shared per-session histories with per-session turn serialization.

use std::collections::HashMap;
use std::sync::Arc;

use doodle_core::{ChatMessage, LLMProvider, Role, Sampling};
use doodle_providers::{Completion, CompletionClient};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::history::HistoryWindow;
use crate::session::ConversationHistory;

type SharedHistory = Arc<Mutex<ConversationHistory>>;

/// Conversation histories keyed by game id.
///
/// The outer map lock is held only to look up or insert a history. Each
/// history has its own lock, held across the whole read, completion call and
/// append of a turn, so turns for one id never interleave while other ids
/// run concurrently.
pub struct ConversationHistoryStore<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    histories: Mutex<HashMap<String, SharedHistory>>,
    client: CompletionClient<P>,
    system_prompt: String,
    window: HistoryWindow,
    sampling: Sampling,
    fallback: String,
}

impl<P> ConversationHistoryStore<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(
        client: CompletionClient<P>,
        system_prompt: impl Into<String>,
        sampling: Sampling,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
            client,
            system_prompt: system_prompt.into(),
            window: HistoryWindow::default(),
            sampling,
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn with_window(mut self, window: HistoryWindow) -> Self {
        self.window = window;
        self
    }

    /// Return the history for `id`, seeding it with the system prompt first
    /// if it does not exist yet.
    pub async fn ensure(&self, id: &str) -> Arc<Mutex<ConversationHistory>> {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(id.to_string()).or_insert_with(|| {
            info!(session_id = %id, "Seeding conversation history");
            Arc::new(Mutex::new(ConversationHistory::seeded(
                self.system_prompt.clone(),
            )))
        });
        Arc::clone(history)
    }

    /// Append one entry to the history of `id`.
    pub async fn append(&self, id: &str, role: Role, content: impl Into<String>) {
        let history = self.ensure(id).await;
        history.lock().await.add_message(role, content.into());
    }

    /// Run one turn: send the history plus `prompt` (as `role`) to the model
    /// and append only the reply to the stored history.
    ///
    /// On any upstream failure the fixed fallback line is used as the reply.
    pub async fn generate(&self, id: &str, prompt: &str, role: Role) -> Completion<String> {
        let history = self.ensure(id).await;
        let mut history = history.lock().await;

        let stored = history.messages();
        let trimmed = self.window.trimmed_count(stored.len());
        if trimmed > 0 {
            debug!(
                session_id = %id,
                stored = stored.len(),
                trimmed,
                "History exceeds resubmission window"
            );
        }

        let mut messages = self.window.select_messages(stored);
        if !prompt.trim().is_empty() {
            messages.push(ChatMessage::new(role, prompt));
        }

        let reply = self
            .client
            .complete_or("persona_turn", &messages, &self.sampling, &self.fallback)
            .await;

        history.add_message(Role::Assistant, reply.value.clone());
        debug!(
            session_id = %id,
            turns = history.message_count(),
            degraded = reply.degraded,
            "Conversation turn completed"
        );
        reply
    }

    /// Copy of the stored history for `id`, if any.
    pub async fn history(&self, id: &str) -> Option<Vec<ChatMessage>> {
        let history = self.histories.lock().await.get(id).cloned()?;
        let messages = history.lock().await.messages().to_vec();
        Some(messages)
    }

    /// Drop the history for `id`. Returns whether one existed.
    pub async fn flush(&self, id: &str) -> bool {
        let removed = self.histories.lock().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "Conversation history flushed");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.histories.lock().await.len()
    }
}
