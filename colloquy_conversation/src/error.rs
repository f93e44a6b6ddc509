use colloquy_core::{CompletionError, MessageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversationError>;

/// Errors that can occur during conversation management.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("Summarization failed: {source}")]
    Summarization {
        #[source]
        source: CompletionError,
    },

    #[error("Completion failed: {0}")]
    Completion(#[source] CompletionError),

    #[error("Empty response from completion service")]
    EmptyResponse,
}

impl ConversationError {
    /// The collaborator failure behind this error, if any.
    #[must_use]
    pub const fn completion_error(&self) -> Option<&CompletionError> {
        match self {
            Self::Summarization { source } | Self::Completion(source) => Some(source),
            Self::Message(_) | Self::EmptyResponse => None,
        }
    }
}
