//! Transport seams between a connection and its underlying stream.
//!
//! The upgrade boundary implements these for its WebSocket halves; the hub
//! and the connection loops only ever see the traits.

use async_trait::async_trait;

use crate::error::FrameError;
use crate::message::Payload;

/// A frame read from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// A text data frame.
    Text(String),
    /// A binary data frame.
    Binary(Vec<u8>),
    /// A ping or pong control frame.
    Control,
    /// The peer started the closing handshake.
    Close,
}

/// Write half of a connection's stream.
#[async_trait]
pub trait FrameSink: Send + 'static {
    /// Write one serialized message.
    async fn send(&mut self, payload: Payload) -> Result<(), FrameError>;

    /// Close the stream. Called at most once, by the write loop.
    async fn close(&mut self) -> Result<(), FrameError>;
}

/// Read half of a connection's stream.
#[async_trait]
pub trait FrameStream: Send + 'static {
    /// Next frame, or `None` once the stream has ended.
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, FrameError>>;
}
