use std::sync::Arc;

use async_trait::async_trait;

use crate::{CompletionError, Message};

/// A language-model completion service: an ordered list of role-tagged
/// messages in, one text reply out.
///
/// Implementations own their retry and timeout policy.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        (**self).complete(messages).await
    }
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Box<T> {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        (**self).complete(messages).await
    }
}
