//! Completion client trait.

use async_trait::async_trait;

use chatcast_core::result::AppResult;

use crate::types::ChatMessage;

/// Produces a reply for a conversation.
#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug + 'static {
    /// Return the assistant reply for `messages` (oldest first).
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;
}
