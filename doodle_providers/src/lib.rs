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

//! Completion providers and the degrade-gracefully client wrapped around them.

mod completion;
mod openai;
mod retry;

pub use completion::{Completion, CompletionClient, DEFAULT_TIMEOUT, parse_structured};
pub use openai::OpenAiProvider;
pub use retry::{is_retryable, retry_with_backoff};
