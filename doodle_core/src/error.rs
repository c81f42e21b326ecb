//! Error taxonomy shared by both game modes.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Invalid state for session {id}: {reason}")]
    InvalidState { id: String, reason: String },

    #[error("Session id space exhausted after {attempts} attempts")]
    ResourceExhausted { attempts: usize },

    /// Only produced internally; the fallback policy absorbs it before it
    /// reaches a game API caller.
    #[error("Upstream failure: {0}")]
    Upstream(#[from] UpstreamError),
}

impl GameError {
    pub fn invalid_state(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Why a completion call produced no usable value.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider error: {0}")]
    Provider(#[from] anyhow::Error),

    #[error("empty completion")]
    EmptyResponse,

    #[error("malformed structured output: {0}")]
    Malformed(String),

    #[error("structured output is missing key '{0}'")]
    MissingKey(String),

    #[error("structured output rejected: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_session() {
        let err = GameError::invalid_state("4821", "no task issued");
        assert_eq!(
            err.to_string(),
            "Invalid state for session 4821: no task issued"
        );
        assert_eq!(
            GameError::NotFound("1001".into()).to_string(),
            "Session not found: 1001"
        );
    }

    #[test]
    fn upstream_converts_into_game_error() {
        let err: GameError = UpstreamError::MissingKey("score".into()).into();
        assert!(matches!(err, GameError::Upstream(UpstreamError::MissingKey(_))));
    }
}
