//! Chat-completion backend configuration.

use serde::{Deserialize, Serialize};

/// Settings for the OpenAI-compatible completion backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the API (without the `/chat/completions` suffix).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token. Falls back to `OPENAI_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Newest history entries kept per client.
    #[serde(default = "default_max_history")]
    pub max_history_messages: usize,
    /// Optional system prompt prepended to every request.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            max_history_messages: default_max_history(),
            system_prompt: None,
        }
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "****" })
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_history_messages", &self.max_history_messages)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_history() -> usize {
    20
}
