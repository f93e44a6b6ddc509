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

mod groq;
mod retry;

pub use groq::{DEFAULT_BASE_URL, DEFAULT_MODEL, GroqProvider};
pub use retry::{RetryPolicy, retry_with_backoff};
