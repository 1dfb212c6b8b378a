//! Per-client conversation history kept in the cache store.

use std::sync::Arc;

use tracing::{debug, warn};

use chatcast_cache::keys;
use chatcast_core::result::AppResult;
use chatcast_core::traits::cache::CacheStore;

use crate::types::ChatMessage;

/// Loads and saves each client's conversation as a JSON array.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    store: Arc<dyn CacheStore>,
    max_messages: usize,
}

impl ConversationHistory {
    /// Create a history store keeping at most `max_messages` entries per client.
    pub fn new(store: Arc<dyn CacheStore>, max_messages: usize) -> Self {
        Self {
            store,
            max_messages,
        }
    }

    /// Load a client's history, oldest first.
    ///
    /// A missing or unparsable entry is replaced by an empty history. Cache
    /// read failures are logged and yield an empty history without touching
    /// the stored value.
    pub async fn load(&self, client: &str) -> Vec<ChatMessage> {
        let key = keys::conversation_history(client);

        let raw = match self.store.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(client, error = %e, "Failed to read conversation history");
                return Vec::new();
            }
        };

        let parsed = raw.map(|value| serde_json::from_str::<Vec<ChatMessage>>(&value));
        match parsed {
            Some(Ok(messages)) => messages,
            Some(Err(e)) => {
                warn!(client, error = %e, "Discarding unparsable conversation history");
                self.reset(client).await;
                Vec::new()
            }
            None => {
                debug!(client, "No conversation history, starting a new one");
                self.reset(client).await;
                Vec::new()
            }
        }
    }

    /// Store a client's history, keeping only the newest entries.
    pub async fn save(&self, client: &str, messages: &[ChatMessage]) -> AppResult<()> {
        let start = messages.len().saturating_sub(self.max_messages);
        let json = serde_json::to_string(&messages[start..])?;
        self.store
            .put(&keys::conversation_history(client), &json)
            .await
    }

    /// Forget a client's history.
    pub async fn clear(&self, client: &str) -> AppResult<()> {
        self.store.delete(&keys::conversation_history(client)).await
    }

    async fn reset(&self, client: &str) {
        if let Err(e) = self.save(client, &[]).await {
            warn!(client, error = %e, "Failed to reset conversation history");
        }
    }
}
