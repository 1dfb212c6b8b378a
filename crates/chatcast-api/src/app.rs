//! Application builder: wires state, router and middleware into an Axum app.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use chatcast_cache::CacheManager;
use chatcast_completion::{CompletionClient, ConversationHistory, OpenAiClient};
use chatcast_core::config::AppConfig;
use chatcast_core::result::AppResult;
use chatcast_core::traits::cache::CacheStore;
use chatcast_realtime::Hub;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Initialize every collaborator from configuration and start the hub loop.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&config.completion)?);
    info!(model = %config.completion.model, "Completion client ready");

    Ok(assemble_state(config, cache, completion))
}

/// Assemble state from already built collaborators. Spawns the hub loop.
pub fn assemble_state(
    config: AppConfig,
    cache: Arc<CacheManager>,
    completion: Arc<dyn CompletionClient>,
) -> AppState {
    let store: Arc<dyn CacheStore> = cache.clone();
    let history = ConversationHistory::new(store, config.completion.max_history_messages);
    let hub = Hub::spawn(&config.realtime);

    AppState {
        config: Arc::new(config),
        cache,
        history,
        completion,
        hub,
        started_at: Instant::now(),
    }
}
