//! Registry-side handle to a single connection.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::EnqueueError;
use crate::message::Payload;

use super::state::{ConnectionState, StateCell};

/// Unique connection identifier, assigned at admission.
pub type ConnectionId = Uuid;

/// The hub's view of an admitted connection.
///
/// Owns the sending side of the bounded outbound queue. The stream itself
/// stays with the connection's write and read loops.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Peer address captured at admission
    pub remote_addr: SocketAddr,
    /// When the connection was admitted
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<Payload>,
    state: Arc<StateCell>,
    token: CancellationToken,
}

impl ConnectionHandle {
    /// Create a handle and the receiving end of its outbound queue.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(
        id: ConnectionId,
        remote_addr: SocketAddr,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Payload>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id,
            remote_addr,
            connected_at: Utc::now(),
            sender,
            state: Arc::new(StateCell::new()),
            token: CancellationToken::new(),
        };
        (handle, receiver)
    }

    /// Place a payload on the outbound queue without waiting.
    pub fn enqueue(&self, payload: Payload) -> Result<(), EnqueueError> {
        if self.state.get() != ConnectionState::Registered {
            return Err(EnqueueError::Closed);
        }
        match self.sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(EnqueueError::Saturated),
            Err(TrySendError::Closed(_)) => Err(EnqueueError::Closed),
        }
    }

    /// Stop both loops and release the stream.
    ///
    /// Safe to call any number of times. Returns true for the call that
    /// started the disconnect.
    pub fn close(&self) -> bool {
        let first = self.state.begin_disconnect();
        self.token.cancel();
        first
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Number of payloads waiting in the outbound queue.
    pub fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    /// Serializable snapshot of this connection.
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            remote_addr: self.remote_addr,
            connected_at: self.connected_at,
            state: self.state(),
            queued: self.queued(),
        }
    }

    pub(crate) fn mark_registered(&self) -> bool {
        self.state.mark_registered()
    }

    pub(crate) fn state_cell(&self) -> Arc<StateCell> {
        Arc::clone(&self.state)
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// Peer address
    pub remote_addr: SocketAddr,
    /// Admitted at
    pub connected_at: DateTime<Utc>,
    /// Lifecycle state
    pub state: ConnectionState,
    /// Payloads waiting to be written
    pub queued: usize,
}
