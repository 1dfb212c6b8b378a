//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use chatcast_core::traits::cache::CacheStore;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let cache_ok = match state.cache.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Cache health check failed");
            false
        }
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if cache_ok { "ok" } else { "degraded" }.to_string(),
        cache: if cache_ok { "connected" } else { "unavailable" }.to_string(),
        ws_connections: state.hub.connection_count().await,
        hub: state.hub.metrics().snapshot(),
    }))
}
