//! A scripted drawing game against the taunting rival.

use doodle_config::Config;
use doodle_conversation::{ConversationConfig, TauntAgent};
use doodle_core::prompt::{AI_PLAYER, PERSONA_NAME};
use doodle_session::SessionRegistry;
use tracing::info;

use super::{build_provider, completion_client, read_line};

/// Input parameters for the Taunt command strategy.
#[derive(Debug, Clone)]
pub struct TauntInput {
    pub players: Vec<String>,
    pub rounds: u32,
}

/// Strategy for driving one full game against the rival.
///
/// Players take turns drawing. Each round the rival guesses from a typed
/// description of the drawing, then reacts to the answer.
#[derive(Debug, Clone, Copy)]
pub struct TauntStrategy;

impl super::CommandStrategy for TauntStrategy {
    type Input = TauntInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let players: Vec<String> = input
            .players
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if players.is_empty() {
            anyhow::bail!("At least one player name is required");
        }
        if input.rounds == 0 {
            anyhow::bail!("Rounds must be at least 1");
        }

        let config = Config::load()?;
        let provider = build_provider(&config)?;
        let client = completion_client(&config, &provider, &config.taunt.model);
        let agent = TauntAgent::new(
            client,
            ConversationConfig::default()
                .with_history_limit(config.taunt.history_limit)
                .with_sampling(config.taunt.sampling),
        );

        let game_id = SessionRegistry::<()>::new().create().await?;
        info!(
            "Starting taunt game: id={}, players={}, rounds={}",
            game_id,
            players.join(","),
            input.rounds
        );

        let say = |line: String| println!("{PERSONA_NAME}: {line}\n");

        say(agent.start_game(&game_id, &players).await);

        let mut rival_wins = 0u32;
        let mut drawers = players.iter().cycle();
        for round in 1..=input.rounds {
            let drawer = drawers.next().map_or(AI_PLAYER, String::as_str);

            say(agent.start_round(&game_id, round, input.rounds).await);
            say(agent
                .start_guess(&game_id, round, input.rounds, drawer, AI_PLAYER)
                .await);

            let description = read_line(&format!("[{drawer}] describe your drawing: "))?;
            say(agent.submit_guess(&game_id, &description).await);

            let answer = read_line("What was the answer? ")?;
            let correct = read_line("Did the rival get it? [y/N] ")?.eq_ignore_ascii_case("y");
            say(agent.react_to_guess(&game_id, correct, &answer, None).await);

            let winner = if correct {
                rival_wins += 1;
                AI_PLAYER
            } else {
                drawer
            };
            say(agent
                .end_round(&game_id, round, input.rounds, winner)
                .await);
        }

        let winner = if rival_wins * 2 > input.rounds {
            AI_PLAYER
        } else {
            players[0].as_str()
        };
        say(agent.end_game(&game_id, winner).await);

        info!(
            "Taunt game finished: id={}, rival_wins={}/{}",
            game_id, rival_wins, input.rounds
        );
        Ok(())
    }
}
