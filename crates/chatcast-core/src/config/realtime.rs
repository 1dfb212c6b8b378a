//! Broadcast hub configuration.

use serde::{Deserialize, Serialize};

/// What a connection does when its outbound queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Treat a full queue as a dead peer and remove the connection.
    #[default]
    Disconnect,
    /// Discard the payload that did not fit and keep the connection.
    DropNewest,
}

/// Real-time (WebSocket) hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connection's outbound queue, in messages.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Capacity of the hub's command queue.
    #[serde(default = "default_command_buffer")]
    pub command_buffer_size: usize,
    /// Policy applied when an outbound queue is full.
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer_size: default_outbound_buffer(),
            command_buffer_size: default_command_buffer(),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_command_buffer() -> usize {
    1024
}
