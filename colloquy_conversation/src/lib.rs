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

//! Conversation state and rolling summarization.
//!
//! A [`ConversationManager`] owns one [`ConversationHistory`], counts user
//! turns, and compacts the history into a summary through a
//! [`colloquy_core::CompletionService`] when the caller asks it to.
//!
//! # Key Features
//! - Validated message log with a turn counter that survives summarization
//! - Advisory summarization trigger with a configurable threshold
//! - Atomic replace-or-noop summarization
//! - Single chat turns against the completion service

mod error;
mod history;
mod manager;
mod summarizer;

pub use error::{ConversationError, Result};
pub use history::{ConversationHistory, HistoryStats};
pub use manager::{ConversationConfig, ConversationManager};
pub use summarizer::{SUMMARY_PREFIX, build_summary_request};
