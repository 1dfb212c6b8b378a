//! WebSocket upgrade handler.

use std::net::SocketAddr;

use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tracing::{info, warn};

use chatcast_core::error::AppError;
use chatcast_realtime::{Connection, Hub};

use crate::error::ApiError;
use crate::extractors::ClientAddr;
use crate::socket;
use crate::state::AppState;

/// GET {ws_path}: upgrade and hand the socket to the hub.
///
/// A failed handshake is answered with a server error and no connection
/// is created.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let ws = ws.map_err(|rejection| {
        warn!(remote_addr = %addr, error = %rejection, "WebSocket handshake failed");
        AppError::internal(format!("WebSocket handshake failed: {rejection}"))
    })?;

    let hub = state.hub.clone();
    Ok(ws
        .on_failed_upgrade(move |e| warn!(remote_addr = %addr, error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| admit(hub, addr, socket)))
}

async fn admit(hub: Hub, addr: SocketAddr, socket: WebSocket) {
    let (sink, stream) = socket::split(socket);
    match hub.register(Connection::new(addr, sink, stream)).await {
        Ok(conn_id) => info!(conn_id = %conn_id, remote_addr = %addr, "WebSocket connection established"),
        Err(e) => warn!(remote_addr = %addr, error = %e, "WebSocket connection refused"),
    }
}
