#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod game;
pub mod prompt;

pub use error::{GameError, Result, UpstreamError};
pub use game::{
    Evaluation, EvaluationReport, GeneratedTask, StructuredOutput, Task, TaskView,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Sampling parameters sent with one completion request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default = "Sampling::default_top_p")]
    pub top_p: f32,
}

impl Sampling {
    #[must_use]
    pub const fn new(temperature: f32, max_tokens: u32, top_p: f32) -> Self {
        Self {
            temperature,
            max_tokens,
            top_p,
        }
    }

    const fn default_top_p() -> f32 {
        1.0
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self::new(0.7, 512, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        sampling: &Sampling,
    ) -> anyhow::Result<LLMResponse>;

    fn get_default_model(&self) -> &str;
}

#[async_trait]
impl<T> LLMProvider for Arc<T>
where
    T: LLMProvider + ?Sized,
{
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        sampling: &Sampling,
    ) -> anyhow::Result<LLMResponse> {
        (**self).chat(messages, model, sampling).await
    }

    fn get_default_model(&self) -> &str {
        (**self).get_default_model()
    }
}
