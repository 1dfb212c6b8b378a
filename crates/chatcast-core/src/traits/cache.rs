//! Cache store trait for pluggable key-value backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Key-value store used to persist per-client conversation history.
///
/// Values are opaque strings (JSON by convention). The store is
/// responsible for key prefixing and TTL enforcement.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
