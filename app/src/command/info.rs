use doodle_config::{API_KEY_ENV, Config};
use doodle_core::Sampling;

/// Strategy for displaying the effective configuration.
///
/// The API key is masked; its source (environment or file) is shown.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== doodle Configuration ===\n");

        println!("Provider:");
        match config.api_key() {
            Ok(key) => {
                let source = if std::env::var(API_KEY_ENV).is_ok() {
                    API_KEY_ENV
                } else {
                    "config file"
                };
                println!("  OpenAI Key: {} (from {source})", mask_key(&key));
            }
            Err(_) => println!("  OpenAI Key: (not set)"),
        }
        println!(
            "  Base URL: {}",
            config
                .providers
                .openai
                .base_url
                .as_deref()
                .unwrap_or("(default)")
        );
        println!();

        println!("Completion:");
        println!("  Timeout: {}s", config.completion.timeout_secs);
        println!("  Retry Delays: {:?}ms", config.completion.retry_delays_ms);
        println!();

        println!("Keyword Mode:");
        println!("  Model: {}", config.keyword.model);
        println!("  Dedup Capacity: {}", config.keyword.dedup_capacity);
        println!("  Max Id Attempts: {}", config.keyword.max_id_attempts);
        println!("  Generation: {}", format_sampling(&config.keyword.generation));
        println!("  Evaluation: {}", format_sampling(&config.keyword.evaluation));
        println!();

        println!("Taunt Mode:");
        println!("  Model: {}", config.taunt.model);
        println!("  History Limit: {}", config.taunt.history_limit);
        println!("  Sampling: {}", format_sampling(&config.taunt.sampling));

        Ok(())
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

fn format_sampling(sampling: &Sampling) -> String {
    format!(
        "temperature={}, max_tokens={}, top_p={}",
        sampling.temperature, sampling.max_tokens, sampling.top_p
    )
}
