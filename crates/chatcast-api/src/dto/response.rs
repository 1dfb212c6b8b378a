//! Response DTOs.

use serde::{Deserialize, Serialize};

use chatcast_realtime::HubMetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of a created post: the completion's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Reply text.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Detailed health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status: `ok` or `degraded`.
    pub status: String,
    /// Cache status.
    pub cache: String,
    /// Registered WebSocket connections.
    pub ws_connections: usize,
    /// Hub counters.
    pub hub: HubMetricsSnapshot,
}
