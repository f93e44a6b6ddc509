//! Conversation manager.
//!
//! The `ConversationManager` is the main entry point: it owns the history,
//! evaluates the summarization trigger, and runs summarization and chat
//! turns against the completion service.

use std::sync::Arc;

use colloquy_core::{CompletionService, Message};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConversationError, Result};
use crate::history::ConversationHistory;
use crate::summarizer::{build_summary_request, summary_message};

/// Configuration for conversation management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// User turns per summary cycle; 0 disables the trigger
    pub summarization_threshold: usize,
    /// Most recent messages kept verbatim when summarizing
    pub preserve_recent: usize,
    /// System prompt sent ahead of the history on chat turns
    pub system_prompt: String,
    /// Length hint for generated summaries; 0 leaves it to the model
    pub summary_max_chars: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            summarization_threshold: 5,
            preserve_recent: 0,
            system_prompt: "You are a helpful AI assistant.".to_string(),
            summary_max_chars: 1000,
        }
    }
}

impl ConversationConfig {
    #[must_use]
    pub const fn with_summarization_threshold(mut self, threshold: usize) -> Self {
        self.summarization_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_preserve_recent(mut self, count: usize) -> Self {
        self.preserve_recent = count;
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// Owns one conversation and decides when and how it is summarized.
///
/// Mutating operations take `&mut self`; run independent conversations on
/// independent managers.
pub struct ConversationManager<P = Arc<dyn CompletionService>>
where
    P: CompletionService,
{
    service: P,
    config: ConversationConfig,
    history: ConversationHistory,
}

impl<P> ConversationManager<P>
where
    P: CompletionService,
{
    pub fn new(service: P, config: ConversationConfig) -> Self {
        let history = ConversationHistory::new();
        info!(
            "Creating conversation manager for conversation: {} (threshold={})",
            history.id(),
            config.summarization_threshold
        );

        Self {
            service,
            config,
            history,
        }
    }

    /// Append a message. Only user messages count as turns.
    ///
    /// Never summarizes; check [`Self::should_summarize`] afterwards.
    pub fn add_message(&mut self, role: &str, content: &str) -> Result<()> {
        let message = Message::parse(role, content)?;
        debug!(
            "Adding {} message ({} chars) to conversation {}",
            message.role(),
            message.content().len(),
            self.history.id()
        );
        self.history.push(message);
        Ok(())
    }

    /// Whether enough user turns have accumulated since the last summary.
    #[must_use]
    pub const fn should_summarize(&self) -> bool {
        let threshold = self.config.summarization_threshold;
        threshold > 0 && self.history.turns_since_summary() >= threshold
    }

    /// Summarize only if [`Self::should_summarize`] holds.
    pub async fn maybe_summarize(&mut self) -> Result<Option<String>> {
        if !self.should_summarize() {
            return Ok(None);
        }
        self.force_summarize().await.map(Some)
    }

    /// Fold the unsummarized messages into the rolling summary.
    ///
    /// Returns the summary in force afterwards. With nothing to fold in this
    /// is a no-op returning the existing summary, or an empty string. On any
    /// failure the history is left exactly as it was.
    pub async fn force_summarize(&mut self) -> Result<String> {
        let window = self
            .history
            .summarization_window(self.config.preserve_recent);

        if window.is_empty() {
            debug!(
                "Nothing to summarize in conversation {}",
                self.history.id()
            );
            return Ok(self.history.summary().unwrap_or_default().to_string());
        }

        let request = build_summary_request(
            self.history.summary(),
            &self.history.messages()[window.clone()],
            self.config.summary_max_chars,
        )?;

        let reply = self.service.complete(&request).await.map_err(|source| {
            warn!(
                "Summarization of conversation {} failed: {source}",
                self.history.id()
            );
            ConversationError::Summarization { source }
        })?;

        let summary = reply.trim().to_string();
        if summary.is_empty() {
            return Err(ConversationError::EmptyResponse);
        }

        let message = summary_message(&summary)?;
        let folded = window.len();
        self.history
            .apply_summary(summary.clone(), message, window.end);

        info!(
            "Summarized {folded} messages in conversation {} ({} remain, {} chars of summary)",
            self.history.id(),
            self.history.len(),
            summary.len()
        );

        Ok(summary)
    }

    /// Run one chat turn: send the history plus `user_input` and record
    /// both sides on success.
    ///
    /// Nothing is recorded when the service fails.
    pub async fn process_turn(&mut self, user_input: &str) -> Result<String> {
        let user_message = Message::user(user_input)?;
        let turn_number = self.history.total_turns() + 1;
        info!(
            "Processing turn {turn_number} for conversation: {}",
            self.history.id()
        );

        let mut request = Vec::with_capacity(self.history.len() + 2);
        if !self.config.system_prompt.trim().is_empty() {
            request.push(Message::system(&self.config.system_prompt)?);
        }
        request.extend_from_slice(self.history.messages());
        request.push(user_message.clone());

        let reply = self
            .service
            .complete(&request)
            .await
            .map_err(ConversationError::Completion)?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ConversationError::EmptyResponse);
        }
        let assistant_message = Message::assistant(reply)?;

        self.history.push(user_message);
        self.history.push(assistant_message);

        debug!("Turn {turn_number} completed successfully");
        Ok(reply.to_string())
    }

    /// Current messages; summarized turns are represented only by the
    /// summary message.
    #[must_use]
    pub fn get_conversation_history(&self) -> &[Message] {
        self.history.messages()
    }

    #[must_use]
    pub const fn history(&self) -> &ConversationHistory {
        &self.history
    }

    #[must_use]
    pub const fn total_turns(&self) -> usize {
        self.history.total_turns()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.history.summary()
    }

    #[must_use]
    pub const fn config(&self) -> &ConversationConfig {
        &self.config
    }

    #[must_use]
    pub fn conversation_text(&self) -> String {
        self.history.conversation_text()
    }

    /// Drop all messages, the summary, and the turn counters.
    pub fn reset(&mut self) {
        info!("Resetting conversation {}", self.history.id());
        self.history.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_core::MessageError;
    use colloquy_core::mock::MockCompletionService;

    fn manager(threshold: usize) -> ConversationManager<MockCompletionService> {
        ConversationManager::new(
            MockCompletionService::new(),
            ConversationConfig::default().with_summarization_threshold(threshold),
        )
    }

    #[test]
    fn test_config_default() {
        let config = ConversationConfig::default();
        assert_eq!(config.summarization_threshold, 5);
        assert_eq!(config.preserve_recent, 0);
        assert!(!config.system_prompt.is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_total_turns_counts_user_messages_only() {
        let mut manager = manager(5);
        let script = [
            ("user", "Hello, I'm John Doe and I need help with my account"),
            ("assistant", "Hello John! What specific issue are you experiencing?"),
            ("system", "Escalation enabled"),
            ("user", "I can't log in. My email is john.doe@email.com"),
        ];
        for (role, content) in script {
            manager.add_message(role, content).expect("valid message");
        }

        assert_eq!(manager.total_turns(), 2);
        assert_eq!(manager.get_conversation_history().len(), 4);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_invalid_role_leaves_history_untouched() {
        let mut manager = manager(5);
        manager.add_message("user", "hello").expect("valid message");

        let err = manager
            .add_message("bogus", "x")
            .expect_err("bogus role must fail");
        assert!(matches!(
            err,
            ConversationError::Message(MessageError::InvalidRole(ref role)) if role == "bogus"
        ));
        assert_eq!(manager.get_conversation_history().len(), 1);
        assert_eq!(manager.total_turns(), 1);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_empty_content_rejected() {
        let mut manager = manager(5);

        let err = manager
            .add_message("user", "  ")
            .expect_err("blank content must fail");
        assert!(matches!(
            err,
            ConversationError::Message(MessageError::InvalidContent)
        ));
        assert!(manager.get_conversation_history().is_empty());
        assert_eq!(manager.total_turns(), 0);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_should_summarize_exactly_at_threshold() {
        let mut manager = manager(4);

        for i in 1..=4 {
            assert!(!manager.should_summarize());
            manager
                .add_message("user", &format!("question {i}"))
                .expect("valid message");
            manager
                .add_message("assistant", &format!("answer {i}"))
                .expect("valid message");
            assert_eq!(manager.should_summarize(), i == 4, "after turn {i}");
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_non_user_roles_never_trigger() {
        let mut manager = manager(1);
        for _ in 0..10 {
            manager
                .add_message("assistant", "still here")
                .expect("valid message");
        }
        assert!(!manager.should_summarize());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_zero_threshold_disables_trigger() {
        let mut manager = manager(0);
        manager.add_message("user", "hello").expect("valid message");
        assert!(!manager.should_summarize());
    }
}
