//! OpenAI-compatible chat-completion client (raw HTTP via reqwest).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use chatcast_core::config::CompletionConfig;
use chatcast_core::error::{AppError, ErrorKind};
use chatcast_core::result::AppResult;

use crate::client::CompletionClient;
use crate::types::{ApiErrorBody, ChatMessage, CompletionRequest, CompletionResponse};

const ENDPOINT_CHAT: &str = "/chat/completions";

/// Client for any API speaking the OpenAI chat-completions format.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    system_prompt: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a client from configuration.
    pub fn new(config: &CompletionConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            warn!("Completion API key is empty; requests will be rejected by the backend");
        }

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            timeout,
        })
    }

    /// Full URL of the completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_base, ENDPOINT_CHAT)
    }

    /// Prepend the configured system prompt, if any.
    fn with_system_prompt<'a>(
        &'a self,
        prompt: Option<&'a ChatMessage>,
        messages: &'a [ChatMessage],
    ) -> CompletionRequest<'a> {
        let mut all: Vec<&'a ChatMessage> = Vec::with_capacity(messages.len() + 1);
        all.extend(prompt);
        all.extend(messages.iter());
        CompletionRequest {
            model: self.model.as_str(),
            messages: all,
        }
    }
}

/// Pull the first choice's text out of a response.
pub(crate) fn first_choice_content(response: CompletionResponse) -> AppResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::external_service("Completion response contained no choices"))
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let prompt = self.system_prompt.as_deref().map(ChatMessage::system);
        let request = self.with_system_prompt(prompt.as_ref(), messages);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Calling chat completions"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::with_source(
                        ErrorKind::ServiceUnavailable,
                        format!("Completion request timed out after {:?}", self.timeout),
                        e,
                    )
                } else if e.is_connect() {
                    AppError::with_source(
                        ErrorKind::ServiceUnavailable,
                        "Completion backend unreachable",
                        e,
                    )
                } else {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        format!("Completion request failed: {e}"),
                        e,
                    )
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to read completion response",
                e,
            )
        })?;

        debug!(
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Completion response received"
        );

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(AppError::external_service(format!(
                "Completion backend returned {status}: {detail}"
            )));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        first_choice_content(parsed)
    }
}
