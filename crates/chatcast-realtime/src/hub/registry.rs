//! Connection registry owned by the hub loop.

use std::collections::HashMap;

use uuid::Uuid;

use crate::connection::handle::{ConnectionHandle, ConnectionId, ConnectionInfo};
use crate::error::EnqueueError;
use crate::message::Payload;

/// Admitted connections, unique by ID.
///
/// Only the hub loop touches this, so it needs no locking of its own.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    by_id: HashMap<ConnectionId, ConnectionHandle>,
}

/// Outcome of one fan-out.
#[derive(Debug, Default)]
pub(crate) struct FanOutReport {
    /// Recipients that accepted the payload.
    pub delivered: usize,
    /// Recipients whose queue was full.
    pub saturated: Vec<ConnectionId>,
    /// Recipients whose queue is gone.
    pub closed: Vec<ConnectionId>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A fresh ID not currently in the registry.
    pub(crate) fn next_id(&self) -> ConnectionId {
        loop {
            let id = Uuid::new_v4();
            if !self.by_id.contains_key(&id) {
                return id;
            }
        }
    }

    /// Admit a handle. Returns false and leaves the registry unchanged if
    /// the ID is already present.
    pub(crate) fn insert(&mut self, handle: ConnectionHandle) -> bool {
        if self.by_id.contains_key(&handle.id) {
            return false;
        }
        self.by_id.insert(handle.id, handle);
        true
    }

    pub(crate) fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.by_id.remove(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: &ConnectionId) -> bool {
        self.by_id.contains_key(id)
    }

    pub(crate) fn infos(&self) -> Vec<ConnectionInfo> {
        self.by_id.values().map(ConnectionHandle::info).collect()
    }

    /// Remove every handle, leaving the registry empty.
    pub(crate) fn drain(&mut self) -> Vec<ConnectionHandle> {
        self.by_id.drain().map(|(_, handle)| handle).collect()
    }

    /// Offer `payload` to every connection except `excluded`.
    ///
    /// Never waits on a recipient. Failures are reported, not acted on.
    pub(crate) fn fan_out(
        &self,
        payload: &Payload,
        excluded: Option<ConnectionId>,
    ) -> FanOutReport {
        let mut report = FanOutReport::default();
        for handle in self.by_id.values() {
            if Some(handle.id) == excluded {
                continue;
            }
            match handle.enqueue(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(EnqueueError::Saturated) => report.saturated.push(handle.id),
                Err(EnqueueError::Closed) => report.closed.push(handle.id),
            }
        }
        report
    }
}
