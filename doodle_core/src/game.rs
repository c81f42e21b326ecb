//! Keyword-task data types and the contract for model-produced JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Keyword issued when task generation cannot reach the model.
pub const FALLBACK_KEYWORD: &str = "달";

pub const FALLBACK_SITUATION: &str = "밤이 깊어지면 하늘의 조용한 친구가 창문 너머로 속삭여. \
     둥근 미소 하나가 어둠 속에서 혼자 빛나고, 이상하게도 마음이 차분해지지. \
     그 장면을 나한테 다시 그려서 보여줄 수 있어?";

pub const FALLBACK_SCORE: u8 = 35;

pub const FALLBACK_FEEDBACK: &str = "하... 평가 시스템이 고장 났는데 그것도 모르고 그림만 그리고 있었어? \
     기본기부터 다시 다져.";

/// A type decoded from the model's JSON reply.
///
/// Decoding rejects anything that is not a JSON object carrying every key in
/// `REQUIRED_KEYS`; `validate` then checks values the type system cannot.
pub trait StructuredOutput: DeserializeOwned {
    const REQUIRED_KEYS: &'static [&'static str];

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// The `{keyword, situation}` pair the judge invents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedTask {
    pub keyword: String,
    pub situation: String,
}

impl GeneratedTask {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            keyword: FALLBACK_KEYWORD.to_string(),
            situation: FALLBACK_SITUATION.to_string(),
        }
    }
}

impl StructuredOutput for GeneratedTask {
    const REQUIRED_KEYS: &'static [&'static str] = &["keyword", "situation"];

    fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("keyword is empty".to_string());
        }
        if self.situation.trim().is_empty() {
            return Err("situation is empty".to_string());
        }
        Ok(())
    }
}

/// A live task bound to one session. The keyword stays server-side until
/// the task is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub keyword: String,
    pub situation: String,
    pub session_id: String,
}

impl Task {
    #[must_use]
    pub fn new(session_id: impl Into<String>, generated: GeneratedTask) -> Self {
        Self {
            keyword: generated.keyword.trim().to_string(),
            situation: generated.situation,
            session_id: session_id.into(),
        }
    }

    /// The public half of the task.
    #[must_use]
    pub fn view(&self) -> TaskView {
        TaskView {
            session_id: self.session_id.clone(),
            situation: self.situation.clone(),
        }
    }
}

/// What a player sees after a task is issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub session_id: String,
    pub situation: String,
}

/// The judge's verdict as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
}

impl Evaluation {
    pub const PASSING_SCORE: u8 = 30;

    #[must_use]
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            feedback: FALLBACK_FEEDBACK.to_string(),
        }
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        self.score >= Self::PASSING_SCORE
    }
}

impl StructuredOutput for Evaluation {
    const REQUIRED_KEYS: &'static [&'static str] = &["score", "feedback"];

    fn validate(&self) -> Result<(), String> {
        if self.score > 100 {
            return Err(format!("score {} is outside 0..=100", self.score));
        }
        if self.feedback.trim().is_empty() {
            return Err("feedback is empty".to_string());
        }
        Ok(())
    }
}

/// Evaluation result handed back to the player, with the task revealed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationReport {
    pub score: u8,
    pub feedback: String,
    pub task: Task,
}

impl EvaluationReport {
    #[must_use]
    pub fn new(evaluation: Evaluation, task: Task) -> Self {
        Self {
            score: evaluation.score,
            feedback: evaluation.feedback,
            task,
        }
    }
}
