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

//! Process-wide game state: live sessions and recently issued keywords.

mod dedup;
mod registry;

pub use dedup::{DEFAULT_CAPACITY, KeywordDedupRing};
pub use registry::{DEFAULT_ID_RANGE, DEFAULT_MAX_ATTEMPTS, SessionRegistry};
