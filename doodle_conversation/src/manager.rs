//! The taunting rival: one method per conversational trigger.

use std::sync::Arc;

use doodle_core::prompt::{AI_PLAYER, PERSONA_SYSTEM_PROMPT, PersonaTurn, build_persona_turn};
use doodle_core::{ChatMessage, LLMProvider, Role, Sampling};
use doodle_providers::CompletionClient;
use tracing::info;

use crate::history::{HistoryConfig, HistoryWindow};
use crate::store::ConversationHistoryStore;

/// Reply used whenever the model cannot produce one.
pub const FALLBACK_REPLY: &str = "으.. 잠깐 오류가 났네. 다시 해볼게!";

/// Configuration for the taunting agent.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// System prompt seeding every game
    pub system_prompt: String,
    /// Maximum stored messages resubmitted per turn
    pub history_limit: usize,
    /// Sampling for persona turns
    pub sampling: Sampling,
    /// Role the trigger prompts are sent as
    pub prompt_role: Role,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: PERSONA_SYSTEM_PROMPT.to_string(),
            history_limit: 40,
            sampling: Sampling::new(0.8, 250, 1.0),
            prompt_role: Role::System,
        }
    }
}

impl ConversationConfig {
    /// Set the history limit.
    #[must_use]
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the sampling parameters.
    #[must_use]
    pub const fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Conversational agent that comments on a drawing game as it happens.
///
/// Every method returns a message; upstream failures degrade to
/// [`FALLBACK_REPLY`] instead of erroring.
pub struct TauntAgent<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    store: ConversationHistoryStore<P>,
    prompt_role: Role,
}

impl<P> TauntAgent<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(client: CompletionClient<P>, config: ConversationConfig) -> Self {
        info!(
            "Creating taunt agent: model={}, history_limit={}",
            client.model(),
            config.history_limit
        );
        let window = HistoryWindow::with_config(
            HistoryConfig::default().with_max_messages(config.history_limit),
        );
        let store = ConversationHistoryStore::new(
            client,
            config.system_prompt,
            config.sampling,
            FALLBACK_REPLY,
        )
        .with_window(window);

        Self {
            store,
            prompt_role: config.prompt_role,
        }
    }

    pub async fn start_game(&self, game_id: &str, players: &[String]) -> String {
        self.turn(
            game_id,
            PersonaTurn::GameStart {
                players: players.to_vec(),
            },
        )
        .await
    }

    pub async fn start_round(&self, game_id: &str, round: u32, total_rounds: u32) -> String {
        self.turn(
            game_id,
            PersonaTurn::RoundStart {
                round,
                total_rounds,
            },
        )
        .await
    }

    /// `winner` is the winning player's name; [`AI_PLAYER`] means the agent won.
    pub async fn end_round(
        &self,
        game_id: &str,
        round: u32,
        total_rounds: u32,
        winner: &str,
    ) -> String {
        self.turn(
            game_id,
            PersonaTurn::RoundEnd {
                round,
                total_rounds,
                persona_won: winner == AI_PLAYER,
            },
        )
        .await
    }

    pub async fn start_guess(
        &self,
        game_id: &str,
        round: u32,
        total_rounds: u32,
        drawer: &str,
        guesser: &str,
    ) -> String {
        self.turn(
            game_id,
            PersonaTurn::GuessStart {
                round,
                total_rounds,
                drawer: drawer.to_string(),
                guesser: guesser.to_string(),
            },
        )
        .await
    }

    /// The agent's guess for a drawing, given a text description of it.
    pub async fn submit_guess(&self, game_id: &str, image_description: &str) -> String {
        self.turn(
            game_id,
            PersonaTurn::Guess {
                image_description: image_description.to_string(),
            },
        )
        .await
    }

    /// `guesser` of `None` means the agent made the guess itself.
    pub async fn react_to_guess(
        &self,
        game_id: &str,
        is_correct: bool,
        answer: &str,
        guesser: Option<&str>,
    ) -> String {
        self.turn(
            game_id,
            PersonaTurn::GuessResult {
                is_correct,
                answer: answer.to_string(),
                guesser: guesser.map(str::to_string),
            },
        )
        .await
    }

    /// Final remark; the game's history is flushed afterwards.
    pub async fn end_game(&self, game_id: &str, winner: &str) -> String {
        let message = self
            .turn(
                game_id,
                PersonaTurn::GameEnd {
                    persona_won: winner == AI_PLAYER,
                },
            )
            .await;
        self.flush(game_id).await;
        message
    }

    pub async fn flush(&self, game_id: &str) -> bool {
        self.store.flush(game_id).await
    }

    /// Stored history for `game_id`, if the game is live.
    pub async fn history(&self, game_id: &str) -> Option<Vec<ChatMessage>> {
        self.store.history(game_id).await
    }

    pub async fn live_games(&self) -> usize {
        self.store.session_count().await
    }

    async fn turn(&self, game_id: &str, turn: PersonaTurn) -> String {
        let prompt = build_persona_turn(&turn);
        let reply = self.store.generate(game_id, &prompt, self.prompt_role).await;
        info!(
            session_id = %game_id,
            kind = turn.kind(),
            degraded = reply.degraded,
            "Persona turn"
        );
        reply.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ConversationConfig::default();
        assert!(config.history_limit > 0);
        assert_eq!(config.prompt_role, Role::System);
        assert!((config.sampling.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.sampling.max_tokens, 250);
    }

    #[test]
    fn test_config_builders() {
        let config = ConversationConfig::default()
            .with_history_limit(7)
            .with_sampling(Sampling::new(0.1, 10, 0.9));
        assert_eq!(config.history_limit, 7);
        assert_eq!(config.sampling.max_tokens, 10);
    }
}
