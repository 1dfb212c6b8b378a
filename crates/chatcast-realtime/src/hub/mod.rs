//! The broadcast hub.
//!
//! [`Hub`] is a cheap, cloneable handle that turns every call into a
//! command for the [`HubRunner`] loop.

mod registry;
mod runner;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::error;

use chatcast_core::config::RealtimeConfig;
use chatcast_core::error::AppError;
use chatcast_core::result::AppResult;

use crate::connection::Connection;
use crate::connection::handle::{ConnectionId, ConnectionInfo};
use crate::message::{Payload, serializer};
use crate::metrics::HubMetrics;

pub use runner::HubRunner;

pub(crate) enum HubCommand {
    Register {
        connection: Connection,
        reply: oneshot::Sender<ConnectionId>,
    },
    Unregister {
        id: ConnectionId,
    },
    Broadcast {
        payload: Payload,
        excluded: Option<ConnectionId>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<ConnectionInfo>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

impl fmt::Debug for HubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { connection, .. } => {
                f.debug_struct("Register").field("connection", connection).finish()
            }
            Self::Unregister { id } => f.debug_struct("Unregister").field("id", id).finish(),
            Self::Broadcast { payload, excluded } => f
                .debug_struct("Broadcast")
                .field("bytes", &payload.len())
                .field("excluded", excluded)
                .finish(),
            Self::Count { .. } => f.write_str("Count"),
            Self::Snapshot { .. } => f.write_str("Snapshot"),
            Self::Shutdown { .. } => f.write_str("Shutdown"),
        }
    }
}

/// Lets connection loops ask for their own removal without keeping the
/// hub alive.
#[derive(Debug, Clone)]
pub(crate) struct HubLink {
    commands: mpsc::WeakSender<HubCommand>,
}

impl HubLink {
    /// Returns true if the request reached the hub.
    pub(crate) async fn request_unregister(&self, id: ConnectionId) -> bool {
        match self.commands.upgrade() {
            Some(commands) => commands.send(HubCommand::Unregister { id }).await.is_ok(),
            None => false,
        }
    }
}

/// Handle to the broadcast hub.
#[derive(Clone)]
pub struct Hub {
    commands: mpsc::Sender<HubCommand>,
    metrics: Arc<HubMetrics>,
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}

impl Hub {
    /// Create a hub and the loop that drives it. The loop must be spawned.
    pub fn new(config: &RealtimeConfig) -> (Self, HubRunner) {
        let (tx, rx) = mpsc::channel(config.command_buffer_size.max(1));
        let metrics = Arc::new(HubMetrics::new());
        let link = HubLink {
            commands: tx.downgrade(),
        };
        let runner = HubRunner::new(rx, link, Arc::clone(&metrics), config);
        (
            Self {
                commands: tx,
                metrics,
            },
            runner,
        )
    }

    /// Create a hub and spawn its loop on the current runtime.
    pub fn spawn(config: &RealtimeConfig) -> Self {
        let (hub, runner) = Self::new(config);
        tokio::spawn(runner.run());
        hub
    }

    /// Admit an upgraded connection and start its loops.
    ///
    /// Fails only once the hub has shut down.
    pub async fn register(&self, connection: Connection) -> AppResult<ConnectionId> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(HubCommand::Register { connection, reply })
            .await
            .map_err(|_| AppError::service_unavailable("Hub is shut down"))?;
        rx.await
            .map_err(|_| AppError::service_unavailable("Hub shut down during admission"))
    }

    /// Remove a connection and close it. Unknown IDs are ignored.
    pub async fn unregister(&self, id: ConnectionId) {
        let _ = self.commands.send(HubCommand::Unregister { id }).await;
    }

    /// Serialize `message` once and deliver it to every connection except `excluded`.
    ///
    /// A message that fails to serialize is logged and dropped.
    pub async fn broadcast<T: Serialize + ?Sized>(
        &self,
        message: &T,
        excluded: Option<ConnectionId>,
    ) {
        match serializer::encode(message) {
            Ok(payload) => self.broadcast_payload(payload, excluded).await,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast, dropping it");
                self.metrics.broadcast_dropped();
            }
        }
    }

    /// Deliver an already serialized payload.
    pub async fn broadcast_payload(&self, payload: Payload, excluded: Option<ConnectionId>) {
        let sent = self
            .commands
            .send(HubCommand::Broadcast { payload, excluded })
            .await;
        if sent.is_ok() {
            self.metrics.broadcast_sent();
        } else {
            self.metrics.broadcast_dropped();
        }
    }

    /// Number of admitted connections. Zero once shut down.
    pub async fn connection_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(HubCommand::Count { reply }).await.is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }

    /// Snapshot of every admitted connection.
    pub async fn connections(&self) -> Vec<ConnectionInfo> {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(HubCommand::Snapshot { reply }).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    /// Stop admitting connections and close every admitted one.
    ///
    /// Returns once the loop has stopped. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(HubCommand::Shutdown { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Whether the loop has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Hub counters.
    pub fn metrics(&self) -> &Arc<HubMetrics> {
        &self.metrics
    }
}

#[cfg(test)]
mod tests;
