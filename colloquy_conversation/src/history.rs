//! Conversation history.
//!
//! The history is an ordered log of messages plus at most one rolling
//! summary. When a summary exists it is carried by a synthetic system message
//! at the head of the log; everything after it is unsummarized.

use std::ops::Range;

use chrono::{DateTime, Utc};
use colloquy_core::{Message, Role};
use serde::Serialize;
use uuid::Uuid;

/// The full state of one conversation.
///
/// Only [`crate::ConversationManager`] mutates a history; everything public
/// here is read-only.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    id: Uuid,
    messages: Vec<Message>,
    summary: Option<String>,
    total_turns: usize,
    turns_at_last_summary: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            messages: Vec::new(),
            summary: None,
            total_turns: 0,
            turns_at_last_summary: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Messages in chronological order, starting with the summary message
    /// when one exists.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[must_use]
    pub const fn has_summary(&self) -> bool {
        self.summary.is_some()
    }

    /// User messages added since creation or the last reset.
    #[must_use]
    pub const fn total_turns(&self) -> usize {
        self.total_turns
    }

    /// User messages added since the last summarization.
    #[must_use]
    pub const fn turns_since_summary(&self) -> usize {
        self.total_turns - self.turns_at_last_summary
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// All message contents joined by single spaces.
    #[must_use]
    pub fn conversation_text(&self) -> String {
        self.messages
            .iter()
            .map(Message::content)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get conversation statistics.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        let count = |role: Role| self.messages.iter().filter(|m| m.role() == role).count();
        let total_characters: usize = self.messages.iter().map(|m| m.content().len()).sum();

        HistoryStats {
            total_messages: self.messages.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            system_messages: count(Role::System),
            total_characters,
            estimated_tokens: total_characters / 4, // Rough estimate: 4 chars per token
            total_turns: self.total_turns,
            has_summary: self.has_summary(),
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        if message.role() == Role::User {
            self.total_turns += 1;
        }
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Index range of the messages a summarization would fold in, keeping
    /// the last `preserve_recent` messages out of it.
    pub(crate) fn summarization_window(&self, preserve_recent: usize) -> Range<usize> {
        let start = self.summary_offset();
        let end = self
            .messages
            .len()
            .saturating_sub(preserve_recent)
            .max(start);
        start..end
    }

    /// Swap the summary message and everything before `window_end` for a new
    /// summary message.
    pub(crate) fn apply_summary(
        &mut self,
        summary: String,
        summary_message: Message,
        window_end: usize,
    ) {
        let mut messages = Vec::with_capacity(self.messages.len() - window_end + 1);
        messages.push(summary_message);
        messages.extend_from_slice(&self.messages[window_end..]);

        self.messages = messages;
        self.summary = Some(summary);
        self.turns_at_last_summary = self.total_turns;
        self.updated_at = Utc::now();
    }

    pub(crate) fn reset(&mut self) {
        self.messages.clear();
        self.summary = None;
        self.total_turns = 0;
        self.turns_at_last_summary = 0;
        self.updated_at = Utc::now();
    }

    const fn summary_offset(&self) -> usize {
        if self.summary.is_some() { 1 } else { 0 }
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub system_messages: usize,
    pub total_characters: usize,
    pub estimated_tokens: usize,
    pub total_turns: usize,
    pub has_summary: bool,
}
