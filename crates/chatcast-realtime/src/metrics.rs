//! Hub metrics counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters updated by the hub loop and the connection loops.
#[derive(Debug, Default)]
pub struct HubMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    broadcasts: AtomicU64,
    broadcasts_dropped: AtomicU64,
    payloads_enqueued: AtomicU64,
    payloads_dropped: AtomicU64,
    saturation_disconnects: AtomicU64,
    messages_received: AtomicU64,
}

impl HubMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn broadcast_sent(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn broadcast_dropped(&self) {
        self.broadcasts_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn payloads_enqueued(&self, count: u64) {
        self.payloads_enqueued.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn payload_dropped(&self) {
        self.payloads_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn saturation_disconnect(&self) {
        self.saturation_disconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> HubMetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        HubMetricsSnapshot {
            connections_opened: opened,
            connections_closed: closed,
            connections_active: opened.saturating_sub(closed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            broadcasts_dropped: self.broadcasts_dropped.load(Ordering::Relaxed),
            payloads_enqueued: self.payloads_enqueued.load(Ordering::Relaxed),
            payloads_dropped: self.payloads_dropped.load(Ordering::Relaxed),
            saturation_disconnects: self.saturation_disconnects.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubMetricsSnapshot {
    /// Connections ever admitted
    pub connections_opened: u64,
    /// Connections removed
    pub connections_closed: u64,
    /// Currently registered connections
    pub connections_active: u64,
    /// Broadcasts fanned out
    pub broadcasts: u64,
    /// Broadcasts dropped before fan-out (serialization failure or hub gone)
    pub broadcasts_dropped: u64,
    /// Payloads placed on outbound queues
    pub payloads_enqueued: u64,
    /// Payloads discarded by the drop-newest policy
    pub payloads_dropped: u64,
    /// Connections removed because their queue was full
    pub saturation_disconnects: u64,
    /// Inbound data frames read from peers
    pub messages_received: u64,
}
