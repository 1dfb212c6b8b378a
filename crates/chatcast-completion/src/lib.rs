//! # chatcast-completion
//!
//! Produces the content Chatcast broadcasts:
//!
//! - [`CompletionClient`] trait and an OpenAI-compatible HTTP implementation
//! - [`ConversationHistory`], the per-client message log kept in the cache

pub mod client;
pub mod history;
pub mod openai;
pub mod types;

pub use client::CompletionClient;
pub use history::ConversationHistory;
pub use openai::OpenAiClient;
pub use types::{ChatMessage, ChatRole};
