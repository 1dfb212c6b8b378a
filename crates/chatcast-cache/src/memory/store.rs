//! In-memory cache implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use chatcast_core::config::cache::MemoryCacheConfig;
use chatcast_core::result::AppResult;
use chatcast_core::traits::cache::CacheStore;

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, String>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    ///
    /// A `ttl_seconds` of zero keeps entries until they are deleted or
    /// evicted by capacity.
    pub fn new(config: &MemoryCacheConfig, ttl_seconds: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_seconds));
        }

        Self {
            cache: builder.build(),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        debug!(key, "Deleted cache entry");
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
