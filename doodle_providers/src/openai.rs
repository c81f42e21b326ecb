use std::time::Duration;

use async_trait::async_trait;
use doodle_core::{ChatMessage, LLMProvider, LLMResponse, Sampling};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::retry::{is_retryable, retry_with_backoff};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    retry_delays: Vec<Duration>,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAiProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: "gpt-4.1".to_string(),
            retry_delays: vec![Duration::from_millis(500), Duration::from_secs(1)],
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_chat_response(&response)
    }
}

/// Pull the first choice's text and the token usage out of a response body.
fn parse_chat_response(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .trim()
        .to_string();

    let usage = response["usage"].as_object().map(|u| doodle_core::Usage {
        prompt_tokens: u32::try_from(u["prompt_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
        completion_tokens: u32::try_from(u["completion_tokens"].as_u64().unwrap_or(0))
            .unwrap_or(0),
        total_tokens: u32::try_from(u["total_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAiProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        sampling: &Sampling,
    ) -> anyhow::Result<LLMResponse> {
        let request = json!({
            "model": model,
            "messages": messages,
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "top_p": sampling.top_p,
        });

        info!("Sending request to chat completions API: model={}", model);

        let response =
            retry_with_backoff(|| self.try_send(&request), &self.retry_delays, is_retryable)
                .await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_and_usage() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "  {\"keyword\": \"해\"}\n"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        });
        let parsed = parse_chat_response(&body);
        assert!(parsed.is_ok());
        if let Ok(response) = parsed {
            assert_eq!(response.content, "{\"keyword\": \"해\"}");
            assert_eq!(response.usage.map(|u| u.total_tokens), Some(17));
        }
    }

    #[test]
    fn missing_content_is_an_error() {
        let body = json!({"choices": []});
        assert!(parse_chat_response(&body).is_err());
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let provider =
            OpenAiProvider::new("k".into()).with_base_url("http://localhost:8080/v1/".into());
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.get_default_model(), "gpt-4.1");
    }
}
