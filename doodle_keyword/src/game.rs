use std::sync::Arc;

use doodle_core::prompt::{TASK_REQUEST, build_evaluation_prompt, build_task_prompt};
use doodle_core::{
    ChatMessage, Evaluation, EvaluationReport, GameError, GeneratedTask, LLMProvider, Result,
    Sampling, Task, TaskView,
};
use doodle_providers::CompletionClient;
use doodle_session::{DEFAULT_CAPACITY, DEFAULT_MAX_ATTEMPTS, KeywordDedupRing, SessionRegistry};
use tracing::info;

/// Tunables for the keyword-task mode.
#[derive(Debug, Clone)]
pub struct KeywordGameConfig {
    /// Recently issued keywords excluded from new tasks
    pub dedup_capacity: usize,
    /// Random draws per session id allocation
    pub max_id_attempts: usize,
    pub generation: Sampling,
    pub evaluation: Sampling,
}

impl Default for KeywordGameConfig {
    fn default() -> Self {
        Self {
            dedup_capacity: DEFAULT_CAPACITY,
            max_id_attempts: DEFAULT_MAX_ATTEMPTS,
            generation: Sampling::new(1.0, 2048, 1.0),
            evaluation: Sampling::new(0.2, 300, 1.0),
        }
    }
}

/// Keyword-task sessions: create, issue a task, evaluate, flush.
///
/// Session state is one optional [`Task`]. State locks are never held across
/// a completion call: inputs are read, the lock is released, the model is
/// called, and results are written back afterwards.
pub struct KeywordGame<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    sessions: SessionRegistry<Task>,
    used_keywords: KeywordDedupRing,
    client: CompletionClient<P>,
    config: KeywordGameConfig,
}

impl<P> KeywordGame<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(client: CompletionClient<P>, config: KeywordGameConfig) -> Self {
        info!(
            "Creating keyword game: model={}, dedup_capacity={}",
            client.model(),
            config.dedup_capacity
        );
        Self {
            sessions: SessionRegistry::new().with_max_attempts(config.max_id_attempts),
            used_keywords: KeywordDedupRing::with_capacity(config.dedup_capacity),
            client,
            config,
        }
    }

    /// Replace the session registry, e.g. to narrow the id space.
    #[must_use]
    pub fn with_registry(mut self, sessions: SessionRegistry<Task>) -> Self {
        self.sessions = sessions;
        self
    }

    pub async fn create_session(&self) -> Result<String> {
        self.sessions.create().await
    }

    /// Issue a fresh task for `session_id`, replacing any previous one.
    ///
    /// Only the clue is returned; the keyword stays in the session. The
    /// keyword is recorded as used before the clue is handed out.
    pub async fn generate_task(&self, session_id: &str) -> Result<TaskView> {
        if !self.sessions.contains(session_id).await {
            return Err(GameError::NotFound(session_id.to_string()));
        }

        let used = self.used_keywords.snapshot().await;
        let messages = [
            ChatMessage::system(build_task_prompt(&used)),
            ChatMessage::user(TASK_REQUEST),
        ];

        let generated = self
            .client
            .complete_structured_or(
                "task_generation",
                &messages,
                &self.config.generation,
                GeneratedTask::fallback(),
            )
            .await;

        let task = Task::new(session_id, generated.value);
        self.used_keywords.add(&task.keyword).await;
        self.sessions.set(session_id, task.clone()).await?;

        info!(
            session_id = %session_id,
            excluded = used.len(),
            degraded = generated.degraded,
            "Task issued"
        );
        Ok(task.view())
    }

    /// Grade `description` against the session's current task.
    ///
    /// The session is removed before the model is called, so a task is
    /// graded at most once; a session without a task stays live.
    pub async fn evaluate(&self, session_id: &str, description: &str) -> Result<EvaluationReport> {
        let task = self
            .sessions
            .take(session_id)
            .await?
            .ok_or_else(|| GameError::invalid_state(session_id, "no task has been issued"))?;

        let prompt = build_evaluation_prompt(&task, description);
        let messages = [
            ChatMessage::system(prompt.system),
            ChatMessage::user(prompt.user),
        ];

        let evaluation = self
            .client
            .complete_structured_or(
                "evaluation",
                &messages,
                &self.config.evaluation,
                Evaluation::fallback(),
            )
            .await;

        info!(
            session_id = %session_id,
            score = evaluation.value.score,
            passed = evaluation.value.passed(),
            degraded = evaluation.degraded,
            "Drawing evaluated"
        );

        Ok(EvaluationReport::new(evaluation.value, task))
    }

    /// Remove the session. Returns whether it existed.
    pub async fn flush(&self, session_id: &str) -> bool {
        self.sessions.delete(session_id).await
    }

    /// Keywords currently excluded from new tasks, oldest first.
    pub async fn used_keywords(&self) -> Vec<String> {
        self.used_keywords.snapshot().await
    }

    pub async fn live_sessions(&self) -> usize {
        self.sessions.len().await
    }
}
