//! Route definitions for the Chatcast HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route and the request logger.
///
/// The WebSocket upgrade is mounted at the configured `server.ws_path`.
pub fn build_router(state: AppState) -> Router {
    let ws_path = state.config.server.ws_path.clone();

    Router::new()
        .route("/", post(handlers::message::post_message))
        .route(&ws_path, get(handlers::ws::ws_upgrade))
        .nest("/api", health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Health check endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
