//! Conversation messages.
//!
//! A [`Message`] can only be obtained through its validated constructors, so
//! every message held anywhere in the workspace has a recognized role and
//! non-blank content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::MessageError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(MessageError::InvalidRole(s.to_string())),
        }
    }
}

/// One conversational turn. Immutable once created.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message, rejecting blank content.
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, MessageError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MessageError::InvalidContent);
        }
        Ok(Self {
            role,
            content,
            timestamp: Utc::now(),
        })
    }

    /// Create a message from a textual role such as `"user"`.
    pub fn parse(role: &str, content: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(role.parse()?, content)
    }

    pub fn user(content: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Result<Self, MessageError> {
        Self::new(Role::System, content)
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The `{role, content}` object expected by chat-completion APIs.
    #[must_use]
    pub fn to_api_format(&self) -> serde_json::Value {
        json!({
            "role": self.role,
            "content": self.content,
        })
    }
}
