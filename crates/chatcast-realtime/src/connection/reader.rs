//! Per-connection read loop.
//!
//! Peers never send anything the hub acts on; the loop exists to notice a
//! closed or broken stream and to keep control frames flowing.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::hub::HubLink;
use crate::metrics::HubMetrics;

use super::frame::{FrameStream, InboundFrame};
use super::handle::ConnectionId;
use super::state::StateCell;

pub(crate) struct Reader {
    pub id: ConnectionId,
    pub stream: Box<dyn FrameStream>,
    pub state: Arc<StateCell>,
    pub token: CancellationToken,
    pub hub: HubLink,
    pub metrics: Arc<HubMetrics>,
}

impl Reader {
    pub(crate) async fn run(mut self) {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => return,
                next = self.stream.next_frame() => next,
            };

            match next {
                Some(Ok(InboundFrame::Text(text))) => {
                    self.metrics.message_received();
                    debug!(conn_id = %self.id, len = text.len(), "Ignoring inbound text frame");
                }
                Some(Ok(InboundFrame::Binary(data))) => {
                    self.metrics.message_received();
                    debug!(conn_id = %self.id, len = data.len(), "Ignoring inbound binary frame");
                }
                Some(Ok(InboundFrame::Control)) => {}
                Some(Ok(InboundFrame::Close)) | None => {
                    debug!(conn_id = %self.id, "Peer closed connection");
                    break;
                }
                Some(Err(e)) => {
                    debug!(conn_id = %self.id, error = %e, "Read failed, disconnecting");
                    break;
                }
            }
        }

        self.state.begin_disconnect();
        self.hub.request_unregister(self.id).await;
    }
}
