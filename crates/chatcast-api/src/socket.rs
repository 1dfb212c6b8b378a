//! Adapters from axum's WebSocket halves to the hub's frame seams.

use async_trait::async_trait;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use chatcast_realtime::{FrameError, FrameSink, FrameStream, InboundFrame, Payload};

/// Write half of an upgraded socket. Payloads go out as text frames.
pub struct WsSink(SplitSink<WebSocket, Message>);

/// Read half of an upgraded socket.
pub struct WsStream(SplitStream<WebSocket>);

/// Split an upgraded socket into the hub's seams.
pub fn split(socket: WebSocket) -> (WsSink, WsStream) {
    let (sink, stream) = socket.split();
    (WsSink(sink), WsStream(stream))
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&mut self, payload: Payload) -> Result<(), FrameError> {
        let text = Utf8Bytes::try_from(payload).map_err(FrameError::transport)?;
        self.0
            .send(Message::Text(text))
            .await
            .map_err(FrameError::transport)
    }

    async fn close(&mut self) -> Result<(), FrameError> {
        self.0.close().await.map_err(FrameError::transport)
    }
}

#[async_trait]
impl FrameStream for WsStream {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, FrameError>> {
        let message = match self.0.next().await? {
            Ok(message) => message,
            Err(e) => return Some(Err(FrameError::transport(e))),
        };

        let frame = match message {
            Message::Text(text) => InboundFrame::Text(text.as_str().to_owned()),
            Message::Binary(data) => InboundFrame::Binary(data.to_vec()),
            Message::Ping(_) | Message::Pong(_) => InboundFrame::Control,
            Message::Close(_) => InboundFrame::Close,
        };
        Some(Ok(frame))
    }
}
