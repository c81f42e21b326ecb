#![warn(
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

//! Multi-turn conversations for the taunting rival.
//!
//! Each game id owns one history seeded with the persona prompt. Turns for
//! the same id are serialized behind a per-session lock while different ids
//! proceed in parallel.
//!
//! # Key Features
//! - Per-session history that always starts with the persona system prompt
//! - Bounded resubmission window over an unbounded stored history
//! - Fallback reply when the model is unreachable

mod history;
mod manager;
mod session;
mod store;

pub use history::{HistoryConfig, HistoryWindow};
pub use manager::{ConversationConfig, FALLBACK_REPLY, TauntAgent};
pub use session::ConversationHistory;
pub use store::ConversationHistoryStore;
