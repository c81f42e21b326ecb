use std::path::{Path, PathBuf};
use std::time::Duration;

use doodle_core::Sampling;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable that takes precedence over the configured API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const CONFIG_DIR: &str = "doodle";
const CONFIG_FILE: &str = "config.json";
const KEY_PLACEHOLDER: &str = "your-openai-api-key-here";
const DEFAULT_MODEL: &str = "gpt-4.1";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub keyword: KeywordConfig,
    #[serde(default)]
    pub taunt: TauntConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "CompletionConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "CompletionConfig::default_retry_delays_ms")]
    pub retry_delays_ms: Vec<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            retry_delays_ms: Self::default_retry_delays_ms(),
        }
    }
}

impl CompletionConfig {
    const fn default_timeout_secs() -> u64 {
        10
    }

    fn default_retry_delays_ms() -> Vec<u64> {
        vec![500, 1000]
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeywordConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "KeywordConfig::default_dedup_capacity")]
    pub dedup_capacity: usize,
    #[serde(default = "KeywordConfig::default_max_id_attempts")]
    pub max_id_attempts: usize,
    #[serde(default = "KeywordConfig::default_generation")]
    pub generation: Sampling,
    #[serde(default = "KeywordConfig::default_evaluation")]
    pub evaluation: Sampling,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            dedup_capacity: Self::default_dedup_capacity(),
            max_id_attempts: Self::default_max_id_attempts(),
            generation: Self::default_generation(),
            evaluation: Self::default_evaluation(),
        }
    }
}

impl KeywordConfig {
    const fn default_dedup_capacity() -> usize {
        30
    }

    const fn default_max_id_attempts() -> usize {
        64
    }

    const fn default_generation() -> Sampling {
        Sampling::new(1.0, 2048, 1.0)
    }

    const fn default_evaluation() -> Sampling {
        Sampling::new(0.2, 300, 1.0)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TauntConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "TauntConfig::default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "TauntConfig::default_sampling")]
    pub sampling: Sampling,
}

impl Default for TauntConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            history_limit: Self::default_history_limit(),
            sampling: Self::default_sampling(),
        }
    }
}

impl TauntConfig {
    const fn default_history_limit() -> usize {
        40
    }

    const fn default_sampling() -> Sampling {
        Sampling::new(0.8, 250, 1.0)
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Config {
    /// Path of the config file under the user's home directory.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'doodle init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your OpenAI API key");
        println!("      (or export {API_KEY_ENV} instead)");
        println!("   2. Run 'doodle keyword' to play a drawing task");
        println!("   3. Run 'doodle taunt --players A,B' to hear the rival talk");
        println!();
        println!("🔧 Configuration options:");
        println!("   - completion.timeout_secs: Upper bound for one completion call");
        println!("   - keyword.dedup_capacity: Recent keywords kept out of new tasks");
        println!("   - taunt.history_limit: Messages resubmitted per persona turn");
        println!();
        Ok(())
    }

    /// Write the JSON template to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let config_template = r#"{
  "providers": {
    "openai": {
      "api_key": "your-openai-api-key-here"
    }
  },
  "completion": {
    "timeout_secs": 10,
    "retry_delays_ms": [500, 1000]
  },
  "keyword": {
    "model": "gpt-4.1",
    "dedup_capacity": 30,
    "max_id_attempts": 64,
    "generation": { "temperature": 1.0, "max_tokens": 2048, "top_p": 1.0 },
    "evaluation": { "temperature": 0.2, "max_tokens": 300, "top_p": 1.0 }
  },
  "taunt": {
    "model": "gpt-4.1",
    "history_limit": 40,
    "sampling": { "temperature": 0.8, "max_tokens": 250, "top_p": 1.0 }
  }
}"#;

        std::fs::write(path, config_template)?;
        info!("Wrote config template to {}", path.display());
        Ok(())
    }

    /// API key to use, with [`API_KEY_ENV`] taking precedence over the file.
    pub fn api_key(&self) -> anyhow::Result<String> {
        resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            &self.providers.openai.api_key,
        )
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: &str) -> anyhow::Result<String> {
    if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    let key = from_file.trim();
    if key.is_empty() || key == KEY_PLACEHOLDER {
        anyhow::bail!("No OpenAI API key configured. Set {API_KEY_ENV} or edit the config file.");
    }
    Ok(key.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::write_template(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.providers.openai.api_key, KEY_PLACEHOLDER);
        assert_eq!(config.completion.timeout(), Duration::from_secs(10));
        assert_eq!(config.keyword.dedup_capacity, 30);
        assert_eq!(config.keyword.generation.max_tokens, 2048);
        assert_eq!(config.taunt.history_limit, 40);
    }

    #[test]
    fn template_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{}").unwrap();

        assert!(Config::write_template(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"providers": {"openai": {"api_key": "sk-test", "base_url": "http://localhost:8080/v1"}},
                "taunt": {"history_limit": 12}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.providers.openai.base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
        assert_eq!(
            config.completion.retry_delays(),
            vec![Duration::from_millis(500), Duration::from_secs(1)]
        );
        assert_eq!(config.keyword.model, "gpt-4.1");
        assert_eq!(config.keyword.max_id_attempts, 64);
        assert_eq!(config.taunt.history_limit, 12);
        assert_eq!(config.taunt.sampling.max_tokens, 250);
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err().to_string();
        assert!(err.contains(CONFIG_FILE));
    }

    #[test]
    fn env_key_wins_over_file() {
        assert_eq!(
            resolve_api_key(Some("sk-env".to_string()), "sk-file").unwrap(),
            "sk-env"
        );
        assert_eq!(
            resolve_api_key(Some("  ".to_string()), "sk-file").unwrap(),
            "sk-file"
        );
        assert!(resolve_api_key(None, KEY_PLACEHOLDER).is_err());
        assert!(resolve_api_key(None, "").is_err());
    }
}
