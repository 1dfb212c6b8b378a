//! The hub's coordinating loop.
//!
//! Owns the registry outright. Admission, removal, fan-out and queries all
//! arrive as commands and are handled one at a time, so no iteration ever
//! sees the registry mid-mutation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chatcast_core::config::{OverflowPolicy, RealtimeConfig};

use crate::connection::Connection;
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::reader::Reader;
use crate::connection::writer::Writer;
use crate::message::Payload;
use crate::metrics::HubMetrics;

use super::registry::Registry;
use super::{HubCommand, HubLink};

/// Drives the hub. Obtain one from [`Hub::new`](super::Hub::new) and spawn
/// [`HubRunner::run`].
#[derive(Debug)]
pub struct HubRunner {
    commands: mpsc::Receiver<HubCommand>,
    link: HubLink,
    registry: Registry,
    metrics: Arc<HubMetrics>,
    outbound_buffer_size: usize,
    overflow_policy: OverflowPolicy,
}

impl HubRunner {
    pub(super) fn new(
        commands: mpsc::Receiver<HubCommand>,
        link: HubLink,
        metrics: Arc<HubMetrics>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            commands,
            link,
            registry: Registry::new(),
            metrics,
            outbound_buffer_size: config.outbound_buffer_size,
            overflow_policy: config.overflow_policy,
        }
    }

    /// Process commands until shut down or every [`Hub`](super::Hub) handle is dropped.
    pub async fn run(mut self) {
        info!(
            outbound_buffer_size = self.outbound_buffer_size,
            overflow_policy = ?self.overflow_policy,
            "Hub started"
        );

        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register { connection, reply } => {
                    let id = self.admit(connection);
                    if reply.send(id).is_err() {
                        debug!(conn_id = %id, "Registrant went away before admission reply");
                    }
                }
                HubCommand::Unregister { id } => self.remove(&id, "unregister requested"),
                HubCommand::Broadcast { payload, excluded } => self.broadcast(payload, excluded),
                HubCommand::Count { reply } => {
                    let _ = reply.send(self.registry.len());
                }
                HubCommand::Snapshot { reply } => {
                    let _ = reply.send(self.registry.infos());
                }
                HubCommand::Shutdown { reply } => {
                    self.close_all();
                    self.commands.close();
                    let _ = reply.send(());
                    info!("Hub stopped");
                    return;
                }
            }
        }

        self.close_all();
        info!("Hub stopped, all handles dropped");
    }

    fn admit(&mut self, connection: Connection) -> ConnectionId {
        let (remote_addr, sink, stream) = connection.into_parts();
        let id = self.registry.next_id();
        let (handle, queue) = ConnectionHandle::new(id, remote_addr, self.outbound_buffer_size);

        let writer = Writer {
            id,
            sink,
            queue,
            state: handle.state_cell(),
            token: handle.token(),
            hub: self.link.clone(),
        };
        let reader = Reader {
            id,
            stream,
            state: handle.state_cell(),
            token: handle.token(),
            hub: self.link.clone(),
            metrics: Arc::clone(&self.metrics),
        };

        handle.mark_registered();
        // IDs come from next_id, so this cannot collide.
        self.registry.insert(handle);
        tokio::spawn(writer.run());
        tokio::spawn(reader.run());

        self.metrics.connection_opened();
        info!(
            conn_id = %id,
            remote_addr = %remote_addr,
            connections = self.registry.len(),
            "Connection registered"
        );
        id
    }

    fn remove(&mut self, id: &ConnectionId, reason: &'static str) {
        match self.registry.remove(id) {
            Some(handle) => {
                handle.close();
                self.metrics.connection_closed();
                info!(
                    conn_id = %id,
                    reason,
                    connections = self.registry.len(),
                    "Connection unregistered"
                );
            }
            None => debug!(conn_id = %id, reason, "Connection already removed"),
        }
    }

    fn broadcast(&mut self, payload: Payload, excluded: Option<ConnectionId>) {
        let report = self.registry.fan_out(&payload, excluded);
        self.metrics.payloads_enqueued(report.delivered as u64);

        for id in &report.saturated {
            match self.overflow_policy {
                OverflowPolicy::Disconnect => {
                    warn!(conn_id = %id, "Outbound queue full, disconnecting");
                    self.metrics.saturation_disconnect();
                    self.remove(id, "outbound queue full");
                }
                OverflowPolicy::DropNewest => {
                    warn!(conn_id = %id, "Outbound queue full, dropping message");
                    self.metrics.payload_dropped();
                }
            }
        }
        for id in &report.closed {
            self.remove(id, "outbound queue closed");
        }

        debug!(
            bytes = payload.len(),
            delivered = report.delivered,
            saturated = report.saturated.len(),
            closed = report.closed.len(),
            "Broadcast fanned out"
        );
    }

    fn close_all(&mut self) {
        for handle in self.registry.drain() {
            handle.close();
            self.metrics.connection_closed();
        }
    }
}
