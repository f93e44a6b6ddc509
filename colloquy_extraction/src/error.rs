use colloquy_core::{CompletionError, MessageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Input text must not be empty")]
    EmptyInput,

    #[error("Confidence score must be between 0.0 and 1.0, got {0}")]
    InvalidConfidence(f64),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("Could not parse extraction response: {0}")]
    Parse(String),
}
