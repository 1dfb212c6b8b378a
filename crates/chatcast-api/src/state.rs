//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use chatcast_cache::CacheManager;
use chatcast_completion::{CompletionClient, ConversationHistory};
use chatcast_core::config::AppConfig;
use chatcast_realtime::Hub;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,
    /// Per-client conversation history
    pub history: ConversationHistory,
    /// Chat-completion backend
    pub completion: Arc<dyn CompletionClient>,
    /// Broadcast hub
    pub hub: Hub,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}
