//! Per-connection write loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::hub::HubLink;
use crate::message::Payload;

use super::frame::FrameSink;
use super::handle::ConnectionId;
use super::state::StateCell;

/// Upper bound on waiting for the hub to confirm removal, and on the
/// closing handshake with the peer.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the write loop owns.
pub(crate) struct Writer {
    pub id: ConnectionId,
    pub sink: Box<dyn FrameSink>,
    pub queue: mpsc::Receiver<Payload>,
    pub state: Arc<StateCell>,
    pub token: CancellationToken,
    pub hub: HubLink,
}

impl Writer {
    /// Drain the outbound queue in order until cancelled or the stream fails.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                next = self.queue.recv() => {
                    let Some(payload) = next else { break };
                    let result = tokio::select! {
                        biased;
                        _ = self.token.cancelled() => break,
                        result = self.sink.send(payload) => result,
                    };
                    if let Err(e) = result {
                        debug!(conn_id = %self.id, error = %e, "Write failed, disconnecting");
                        self.state.begin_disconnect();
                        if self.hub.request_unregister(self.id).await {
                            let _ = tokio::time::timeout(CLOSE_TIMEOUT, self.token.cancelled()).await;
                        }
                        break;
                    }
                }
            }
        }

        match tokio::time::timeout(CLOSE_TIMEOUT, self.sink.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(conn_id = %self.id, error = %e, "Stream close failed"),
            Err(_) => warn!(conn_id = %self.id, "Stream close timed out"),
        }
        self.state.mark_closed();
        debug!(conn_id = %self.id, "Write loop finished");
    }
}
