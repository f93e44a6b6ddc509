//! Deterministic completion service for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{CompletionError, CompletionService, Message};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockStep {
    Reply(String),
    Fail(CompletionError),
}

/// A completion service that answers from a script, in order, and records
/// every request it receives.
///
/// Once the script is exhausted every call fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionService {
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockCompletionService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_steps(steps: Vec<MockStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into())),
            requests: Arc::default(),
        }
    }

    /// Script a run of successful replies.
    #[must_use]
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_steps(
            replies
                .into_iter()
                .map(|r| MockStep::Reply(r.into()))
                .collect(),
        )
    }

    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(MockStep::Reply(reply.into()));
    }

    pub async fn push_error(&self, error: CompletionError) {
        self.script.lock().await.push_back(MockStep::Fail(error));
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        debug!("Mock completion called with {} messages", messages.len());
        self.requests.lock().await.push(messages.to_vec());

        match self.script.lock().await.pop_front() {
            Some(MockStep::Reply(text)) => Ok(text),
            Some(MockStep::Fail(error)) => Err(error),
            None => Err(CompletionError::Transport(
                "mock script exhausted".to_string(),
            )),
        }
    }
}
