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

//! Keyword-task mode: the judge invents a hidden subject, the player draws
//! it from a poetic clue, and the judge grades the drawing's description.

mod game;

pub use game::{KeywordGame, KeywordGameConfig};
