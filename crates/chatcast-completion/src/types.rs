//! Chat message types and the OpenAI wire format.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
    /// The human side of the conversation.
    User,
    /// Model replies.
    Assistant,
}

/// One entry of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    /// Model name.
    pub model: &'a str,
    /// Conversation so far.
    pub messages: Vec<&'a ChatMessage>,
}

/// Response of `POST /chat/completions` (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Generated alternatives.
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// One generated alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    /// The generated message.
    pub message: CompletionMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message body of a choice; content may be null for tool calls.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by OpenAI-compatible APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error details.
    pub error: ApiErrorDetail,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    pub message: String,
}
