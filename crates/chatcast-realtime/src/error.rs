//! Errors local to a single connection.
//!
//! These never leave the connection's own loops or the hub's fan-out; the
//! hub turns them into a removal, never into a failure of its own loop.

use thiserror::Error;

/// Why a payload could not be placed on an outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// The queue is at capacity; the write loop is not keeping up.
    #[error("outbound queue is full")]
    Saturated,
    /// The connection is disconnecting or its write loop has exited.
    #[error("connection is closed")]
    Closed,
}

/// Failure reading from or writing to the underlying stream.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer closed the stream.
    #[error("stream closed by peer")]
    Closed,
    /// The transport reported an error.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FrameError {
    /// Wrap a transport-specific error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}
