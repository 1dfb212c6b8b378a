//! Connection lifecycle state.
//!
//! `Connecting -> Registered -> Disconnecting -> Closed`. Transitions only
//! move forward; a connection never returns to `Registered`.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Upgraded, waiting for the hub to admit it.
    Connecting,
    /// Admitted and visible to broadcast.
    Registered,
    /// Removal requested; queued payloads are no longer written.
    Disconnecting,
    /// Stream released and removed from the hub.
    Closed,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Registered,
            2 => Self::Disconnecting,
            _ => Self::Closed,
        }
    }
}

/// Atomic cell shared by a connection's handle and its loops.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    /// A new cell in `Connecting`.
    pub fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Connecting as u8))
    }

    /// Current state.
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// `Connecting -> Registered`. Returns false if the connection already left `Connecting`.
    pub fn mark_registered(&self) -> bool {
        self.transition(ConnectionState::Connecting, ConnectionState::Registered)
    }

    /// Enter `Disconnecting` from `Connecting` or `Registered`.
    ///
    /// Returns true only for the call that performed the transition.
    pub fn begin_disconnect(&self) -> bool {
        self.transition(ConnectionState::Registered, ConnectionState::Disconnecting)
            || self.transition(ConnectionState::Connecting, ConnectionState::Disconnecting)
    }

    /// Enter `Closed` from any state.
    pub fn mark_closed(&self) {
        self.0.store(ConnectionState::Closed as u8, Ordering::SeqCst);
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ConnectionState::Connecting);
        assert!(cell.mark_registered());
        assert_eq!(cell.get(), ConnectionState::Registered);
        assert!(cell.begin_disconnect());
        assert_eq!(cell.get(), ConnectionState::Disconnecting);
        cell.mark_closed();
        assert_eq!(cell.get(), ConnectionState::Closed);
    }

    #[test]
    fn test_begin_disconnect_once() {
        let cell = StateCell::new();
        cell.mark_registered();
        assert!(cell.begin_disconnect());
        assert!(!cell.begin_disconnect());
    }

    #[test]
    fn test_never_reenters_registered() {
        let cell = StateCell::new();
        cell.mark_registered();
        cell.begin_disconnect();
        assert!(!cell.mark_registered());
        cell.mark_closed();
        assert!(!cell.mark_registered());
        assert!(!cell.begin_disconnect());
        assert_eq!(cell.get(), ConnectionState::Closed);
    }
}
