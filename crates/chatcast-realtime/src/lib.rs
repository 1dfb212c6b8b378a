//! # chatcast-realtime
//!
//! Real-time broadcast engine for Chatcast. Provides:
//!
//! - A [`Hub`] whose single coordinating loop owns the connection registry
//!   and serializes admission, removal, and fan-out
//! - [`Connection`]s with a bounded outbound queue drained by a dedicated
//!   write loop, plus a read loop that detects peer disconnects
//! - Transport seams ([`FrameSink`], [`FrameStream`]) so the hub never
//!   depends on a particular WebSocket library
//! - The JSON wire message and hub metrics

pub mod connection;
pub mod error;
pub mod hub;
pub mod message;
pub mod metrics;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::frame::{FrameSink, FrameStream, InboundFrame};
pub use connection::handle::{ConnectionHandle, ConnectionId, ConnectionInfo};
pub use connection::state::ConnectionState;
pub use connection::Connection;
pub use error::{EnqueueError, FrameError};
pub use hub::{Hub, HubRunner};
pub use message::types::WireMessage;
pub use message::Payload;
pub use metrics::{HubMetrics, HubMetricsSnapshot};
