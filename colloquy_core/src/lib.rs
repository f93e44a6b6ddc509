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

//! Shared building blocks for colloquy: validated messages and the
//! completion service contract every other crate talks through.

mod completion;
mod error;
mod message;
pub mod mock;

pub use completion::CompletionService;
pub use error::{CompletionError, MessageError};
pub use message::{Message, Role};
