//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::io::Write;
use std::sync::Arc;

use doodle_config::Config;
use doodle_core::LLMProvider;
use doodle_providers::{CompletionClient, OpenAiProvider};
use tracing::info;

mod info;
mod init;
mod keyword;
mod taunt;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use keyword::{KeywordInput, KeywordStrategy};
pub use taunt::{TauntInput, TauntStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// adding a command only requires implementing this trait.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Build the shared completion provider from the loaded configuration.
fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let mut provider = OpenAiProvider::new(config.api_key()?)
        .with_retry_delays(config.completion.retry_delays());

    if let Some(base_url) = &config.providers.openai.base_url {
        info!("Using custom completion endpoint: {}", base_url);
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(Arc::new(provider))
}

/// A completion client for one call site's model, sharing `provider`.
fn completion_client(
    config: &Config,
    provider: &Arc<dyn LLMProvider>,
    model: &str,
) -> CompletionClient {
    CompletionClient::new(Arc::clone(provider))
        .with_model(model.to_string())
        .with_timeout(config.completion.timeout())
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
