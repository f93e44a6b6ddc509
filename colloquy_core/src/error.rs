use thiserror::Error;

/// Errors raised while building a [`crate::Message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("Invalid role: '{0}' (expected one of: user, assistant, system)")]
    InvalidRole(String),

    #[error("Message content must not be empty")]
    InvalidContent,
}

/// Failures reported by a completion service.
///
/// Retry policy for the transient variants belongs to the service itself;
/// callers see these only once the service has given up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CompletionError {
    /// Whether a later attempt with the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit(_) | Self::Transport(_))
    }

    /// Short label for the error class, used in diagnostics output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::RateLimit(_) => "rate_limit",
            Self::Transport(_) => "transport",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(CompletionError::RateLimit("slow down".to_string()).is_retryable());
        assert!(CompletionError::Transport("reset".to_string()).is_retryable());
        assert!(!CompletionError::Authentication("bad key".to_string()).is_retryable());
        assert!(!CompletionError::InvalidRequest("empty".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = MessageError::InvalidRole("bogus".to_string());
        assert!(err.to_string().contains("bogus"));

        let err = CompletionError::RateLimit("429".to_string());
        assert_eq!(err.to_string(), "Rate limit exceeded: 429");
        assert_eq!(err.kind(), "rate_limit");
    }
}
