//! In-memory transport doubles for hub and connection tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::connection::Connection;
use crate::connection::frame::{FrameSink, FrameStream, InboundFrame};
use crate::error::FrameError;
use crate::message::Payload;

/// How a test sink behaves on `send`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SinkMode {
    /// Forward every payload to the peer.
    Recording,
    /// Never complete a write.
    Stalled,
    /// Fail every write.
    Failing,
}

struct TestSink {
    mode: SinkMode,
    delivered: mpsc::UnboundedSender<Payload>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameSink for TestSink {
    async fn send(&mut self, payload: Payload) -> Result<(), FrameError> {
        match self.mode {
            SinkMode::Recording => self.delivered.send(payload).map_err(|_| FrameError::Closed),
            SinkMode::Stalled => std::future::pending().await,
            SinkMode::Failing => Err(FrameError::transport(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))),
        }
    }

    async fn close(&mut self) -> Result<(), FrameError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct TestStream {
    frames: mpsc::UnboundedReceiver<Result<InboundFrame, FrameError>>,
}

#[async_trait]
impl FrameStream for TestStream {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, FrameError>> {
        self.frames.recv().await
    }
}

/// The far end of a test connection. Dropping it ends the read side.
pub(crate) struct Peer {
    pub received: mpsc::UnboundedReceiver<Payload>,
    pub frames: mpsc::UnboundedSender<Result<InboundFrame, FrameError>>,
    pub closes: Arc<AtomicUsize>,
}

impl Peer {
    /// Times the connection closed its sink.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// A connection from `127.0.0.1:{port}` backed by in-memory channels.
pub(crate) fn connection(port: u16, mode: SinkMode) -> (Connection, Peer) {
    let (delivered, received) = mpsc::unbounded_channel();
    let (frames, inbound) = mpsc::unbounded_channel();
    let closes = Arc::new(AtomicUsize::new(0));
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let sink = TestSink {
        mode,
        delivered,
        closes: Arc::clone(&closes),
    };
    let stream = TestStream { frames: inbound };
    let peer = Peer {
        received,
        frames,
        closes,
    };
    (Connection::new(addr, sink, stream), peer)
}
