//! Completion calls with a bounded timeout and a fixed fallback per call site.
//!
//! Every failure mode of the upstream model (network error, timeout, rate
//! limit, unparseable or invalid JSON) ends in the same place: the call site's
//! fallback value is returned and the failure is logged. Callers never see an
//! upstream error, so a model outage cannot abort a running game.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use doodle_core::{ChatMessage, LLMProvider, Sampling, StructuredOutput, UpstreamError};
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static CODE_FENCE: OnceLock<regex::Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn code_fence() -> &'static regex::Regex {
    CODE_FENCE.get_or_init(|| {
        regex::Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Parse raw model text as a JSON object carrying every key in `required_keys`.
///
/// A single Markdown code fence around the object is tolerated.
pub fn parse_structured(raw: &str, required_keys: &[&str]) -> Result<Value, UpstreamError> {
    let trimmed = raw.trim();
    let body = code_fence()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map_or(trimmed, |m| m.as_str());

    let value: Value =
        serde_json::from_str(body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(UpstreamError::Malformed(
            "expected a JSON object".to_string(),
        ));
    };

    if let Some(missing) = required_keys.iter().find(|k| !object.contains_key(**k)) {
        return Err(UpstreamError::MissingKey((*missing).to_string()));
    }

    Ok(value)
}

/// A completion value and whether it came from the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Completion<T> {
    const fn fresh(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    const fn degraded(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// Wraps an [`LLMProvider`] with a timeout, output validation and the
/// fallback policy.
pub struct CompletionClient<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    provider: P,
    model: String,
    timeout: Duration,
}

impl<P> CompletionClient<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(provider: P) -> Self {
        let model = provider.get_default_model().to_string();
        Self {
            provider,
            model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One raw completion call bounded by the configured timeout.
    pub async fn call(
        &self,
        messages: &[ChatMessage],
        sampling: &Sampling,
    ) -> Result<String, UpstreamError> {
        debug!(
            model = %self.model,
            turns = messages.len(),
            "Calling completion provider"
        );

        let response = tokio::time::timeout(
            self.timeout,
            self.provider.chat(messages, &self.model, sampling),
        )
        .await
        .map_err(|_| UpstreamError::Timeout(self.timeout))??;

        let text = response.content.trim();
        if text.is_empty() {
            return Err(UpstreamError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Free-text completion; `fallback` replaces the reply on any failure.
    pub async fn complete_or(
        &self,
        site: &str,
        messages: &[ChatMessage],
        sampling: &Sampling,
        fallback: &str,
    ) -> Completion<String> {
        match self.call(messages, sampling).await {
            Ok(text) => Completion::fresh(text),
            Err(e) => Self::degrade(site, &e, fallback.to_string()),
        }
    }

    /// Structured completion decoded as `T`; `fallback` replaces it when the
    /// call fails or the output does not decode and validate.
    pub async fn complete_structured_or<T>(
        &self,
        site: &str,
        messages: &[ChatMessage],
        sampling: &Sampling,
        fallback: T,
    ) -> Completion<T>
    where
        T: StructuredOutput,
    {
        match self.call_structured::<T>(messages, sampling).await {
            Ok(value) => Completion::fresh(value),
            Err(e) => Self::degrade(site, &e, fallback),
        }
    }

    async fn call_structured<T>(
        &self,
        messages: &[ChatMessage],
        sampling: &Sampling,
    ) -> Result<T, UpstreamError>
    where
        T: StructuredOutput,
    {
        let raw = self.call(messages, sampling).await?;
        let value = parse_structured(&raw, T::REQUIRED_KEYS)?;
        let parsed: T =
            serde_json::from_value(value).map_err(|e| UpstreamError::Malformed(e.to_string()))?;
        parsed.validate().map_err(UpstreamError::Invalid)?;
        Ok(parsed)
    }

    fn degrade<T>(site: &str, error: &UpstreamError, fallback: T) -> Completion<T> {
        warn!(site, error = %error, "Completion failed, using fallback");
        Completion::degraded(fallback)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doodle_core::{Evaluation, GeneratedTask, LLMResponse};

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubProvider(Behavior);

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
            _sampling: &Sampling,
        ) -> anyhow::Result<LLMResponse> {
            match self.0 {
                Behavior::Reply(text) => Ok(LLMResponse {
                    content: text.to_string(),
                    usage: None,
                }),
                Behavior::Fail => anyhow::bail!("429 Too Many Requests"),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    anyhow::bail!("unreachable")
                }
            }
        }

        fn get_default_model(&self) -> &'static str {
            "stub"
        }
    }

    fn client(behavior: Behavior) -> CompletionClient<StubProvider> {
        CompletionClient::new(StubProvider(behavior)).with_timeout(Duration::from_millis(50))
    }

    fn sampling() -> Sampling {
        Sampling::new(0.2, 300, 1.0)
    }

    #[test]
    fn parse_accepts_plain_and_fenced_json() {
        let plain = parse_structured(r#"{"score": 80, "feedback": "ok"}"#, &["score"]).unwrap();
        assert_eq!(plain["score"], 80);

        let fenced = parse_structured(
            "```json\n{\"keyword\": \"해\", \"situation\": \"뜨거운 눈\"}\n```",
            &["keyword", "situation"],
        )
        .unwrap();
        assert_eq!(fenced["keyword"], "해");
    }

    #[test]
    fn parse_rejects_bad_payloads() {
        assert!(matches!(
            parse_structured("not json", &[]),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_structured("[1, 2]", &[]),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_structured(r#"{"score": 80}"#, &["score", "feedback"]),
            Err(UpstreamError::MissingKey(k)) if k == "feedback"
        ));
    }

    #[tokio::test]
    async fn structured_success_is_not_degraded() {
        let client = client(Behavior::Reply(r#"{"keyword": "해", "situation": "뜨거운 눈"}"#));
        let result = client
            .complete_structured_or("task", &[], &sampling(), GeneratedTask::fallback())
            .await;
        assert!(!result.degraded);
        assert_eq!(result.value.keyword, "해");
    }

    #[tokio::test]
    async fn provider_failure_uses_fallback() {
        let client = client(Behavior::Fail);
        let result = client
            .complete_structured_or("evaluation", &[], &sampling(), Evaluation::fallback())
            .await;
        assert!(result.degraded);
        assert_eq!(result.value, Evaluation::fallback());
    }

    #[tokio::test]
    async fn invalid_values_use_fallback() {
        let out_of_range = client(Behavior::Reply(r#"{"score": 250, "feedback": "대단해"}"#));
        let result = out_of_range
            .complete_structured_or("evaluation", &[], &sampling(), Evaluation::fallback())
            .await;
        assert!(result.degraded);
        assert_eq!(result.value.score, 35);

        let not_a_number = client(Behavior::Reply(r#"{"score": "high", "feedback": "대단해"}"#));
        let result = not_a_number
            .complete_structured_or("evaluation", &[], &sampling(), Evaluation::fallback())
            .await;
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn timeout_uses_fallback() {
        let client = client(Behavior::Hang);
        let err = client.call(&[], &sampling()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout(_)));

        let result = client
            .complete_or("persona", &[], &sampling(), "미안, 잠깐 오류가 났어!")
            .await;
        assert!(result.degraded);
        assert_eq!(result.value, "미안, 잠깐 오류가 났어!");
    }

    #[tokio::test]
    async fn blank_reply_is_an_error() {
        let client = client(Behavior::Reply("   "));
        assert!(matches!(
            client.call(&[], &sampling()).await,
            Err(UpstreamError::EmptyResponse)
        ));
    }
}
