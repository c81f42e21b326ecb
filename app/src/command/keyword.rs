//! One round of the keyword drawing task from the terminal.

use doodle_config::Config;
use doodle_keyword::{KeywordGame, KeywordGameConfig};
use tracing::info;

use super::{build_provider, completion_client, read_line};

/// Input parameters for the Keyword command strategy.
#[derive(Debug, Clone)]
pub struct KeywordInput {
    /// Drawing description; read from stdin when absent
    pub description: Option<String>,
}

/// Strategy for playing one keyword task.
///
/// Creates a session, prints the clue, takes a description of the drawing
/// and prints the grade together with the hidden keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordStrategy;

impl super::CommandStrategy for KeywordStrategy {
    type Input = KeywordInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let provider = build_provider(&config)?;
        let client = completion_client(&config, &provider, &config.keyword.model);

        let game = KeywordGame::new(
            client,
            KeywordGameConfig {
                dedup_capacity: config.keyword.dedup_capacity,
                max_id_attempts: config.keyword.max_id_attempts,
                generation: config.keyword.generation,
                evaluation: config.keyword.evaluation,
            },
        );

        let session_id = game.create_session().await?;
        info!("Session created: {}", session_id);

        let task = game.generate_task(&session_id).await?;
        println!("=== Session {} ===", task.session_id);
        println!("Clue: {}\n", task.situation);

        let description = match input.description {
            Some(description) => description,
            None => read_line("Describe your drawing: ")?,
        };
        if description.trim().is_empty() {
            game.flush(&session_id).await;
            anyhow::bail!("Drawing description must not be empty");
        }

        let report = game.evaluate(&session_id, &description).await?;
        println!("\nScore: {}/100", report.score);
        println!("Feedback: {}", report.feedback);
        println!("Keyword: {}", report.task.keyword);

        Ok(())
    }
}
