//! Prompt construction for both game characters.
//!
//! Everything here is pure: the same inputs always produce the same text, so
//! callers can build prompts from a state snapshot and release their locks
//! before talking to the model.

mod evaluation;
mod persona;
mod task;

pub use evaluation::{EvaluationPrompt, build_evaluation_prompt};
pub use persona::{AI_PLAYER, PERSONA_NAME, PERSONA_SYSTEM_PROMPT, PersonaTurn, build_persona_turn};
pub use task::{TASK_REQUEST, build_task_prompt};
