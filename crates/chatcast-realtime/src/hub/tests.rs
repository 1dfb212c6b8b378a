use std::collections::HashSet;
use std::time::Duration;

use chatcast_core::config::{OverflowPolicy, RealtimeConfig};
use chatcast_core::error::ErrorKind;
use tokio::time::timeout;

use super::*;
use crate::connection::frame::InboundFrame;
use crate::message::types::WireMessage;
use crate::testing::{self, Peer, SinkMode};

const WAIT: Duration = Duration::from_secs(2);

fn config(outbound: usize, policy: OverflowPolicy) -> RealtimeConfig {
    RealtimeConfig {
        outbound_buffer_size: outbound,
        overflow_policy: policy,
        ..RealtimeConfig::default()
    }
}

async fn join(hub: &Hub, port: u16, mode: SinkMode) -> (ConnectionId, Peer) {
    let (connection, peer) = testing::connection(port, mode);
    let id = hub.register(connection).await.unwrap();
    (id, peer)
}

async fn next(peer: &mut Peer) -> Payload {
    timeout(WAIT, peer.received.recv())
        .await
        .expect("timed out waiting for payload")
        .expect("sink dropped")
}

async fn wait_for_count(hub: &Hub, expected: usize) {
    timeout(WAIT, async {
        while hub.connection_count().await != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("connection count never settled");
}

async fn wait_for_close(peer: &Peer) {
    timeout(WAIT, async {
        while peer.close_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("stream never closed");
}

#[tokio::test]
async fn test_broadcast_excludes_sender_then_reaches_rest() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_a, mut peer_a) = join(&hub, 1, SinkMode::Recording).await;
    let (b, mut peer_b) = join(&hub, 2, SinkMode::Recording).await;
    let (_c, mut peer_c) = join(&hub, 3, SinkMode::Recording).await;

    hub.broadcast(&WireMessage::post_created("hi"), Some(b)).await;

    let expected = br#"{"type":"Post_Created","payload":"hi"}"#;
    assert_eq!(&next(&mut peer_a).await[..], expected);
    assert_eq!(&next(&mut peer_c).await[..], expected);

    hub.unregister(b).await;
    assert_eq!(hub.connection_count().await, 2);
    assert!(peer_b.received.try_recv().is_err());

    hub.broadcast(&WireMessage::new("Ping", serde_json::Value::Null), None)
        .await;

    let ping = br#"{"type":"Ping","payload":null}"#;
    assert_eq!(&next(&mut peer_a).await[..], ping);
    assert_eq!(&next(&mut peer_c).await[..], ping);
    wait_for_close(&peer_b).await;
    assert!(peer_b.received.try_recv().is_err());
}

#[tokio::test]
async fn test_concurrent_admissions_get_distinct_ids() {
    let hub = Hub::spawn(&RealtimeConfig::default());

    let mut tasks = Vec::new();
    for port in 0..50u16 {
        let hub = hub.clone();
        tasks.push(tokio::spawn(async move {
            let (connection, peer) = testing::connection(port, SinkMode::Recording);
            (hub.register(connection).await.unwrap(), peer)
        }));
    }

    let mut ids = HashSet::new();
    let mut peers = Vec::new();
    for task in tasks {
        let (id, peer) = task.await.unwrap();
        ids.insert(id);
        peers.push(peer);
    }

    assert_eq!(ids.len(), 50);
    assert_eq!(hub.connection_count().await, 50);
    assert_eq!(hub.connections().await.len(), 50);
}

#[tokio::test]
async fn test_saturated_peer_is_disconnected_without_stalling_others() {
    let hub = Hub::spawn(&config(2, OverflowPolicy::Disconnect));
    let (_slow, slow_peer) = join(&hub, 1, SinkMode::Stalled).await;
    let (_fast, mut fast_peer) = join(&hub, 2, SinkMode::Recording).await;

    for i in 0..6 {
        hub.broadcast(&WireMessage::new("Tick", i), None).await;
        let payload = next(&mut fast_peer).await;
        let message: WireMessage = serde_json::from_slice(&payload).unwrap();
        assert_eq!(message.payload, i);
    }

    assert_eq!(hub.connection_count().await, 1);
    assert_eq!(hub.metrics().snapshot().saturation_disconnects, 1);
    wait_for_close(&slow_peer).await;
}

#[tokio::test]
async fn test_back_to_back_broadcasts_arrive_in_order() {
    let hub = Hub::spawn(&config(32, OverflowPolicy::Disconnect));
    let (_id, mut peer) = join(&hub, 1, SinkMode::Recording).await;

    for i in 0..20 {
        hub.broadcast(&WireMessage::new("Tick", i), None).await;
    }

    for i in 0..20 {
        let message: WireMessage = serde_json::from_slice(&next(&mut peer).await).unwrap();
        assert_eq!(message.payload, i);
    }
    assert_eq!(hub.metrics().snapshot().payloads_enqueued, 20);
    assert_eq!(hub.connection_count().await, 1);
}

#[tokio::test]
async fn test_drop_newest_keeps_saturated_peer() {
    let hub = Hub::spawn(&config(1, OverflowPolicy::DropNewest));
    let (_slow, _slow_peer) = join(&hub, 1, SinkMode::Stalled).await;
    let (_fast, mut fast_peer) = join(&hub, 2, SinkMode::Recording).await;

    for i in 0..4 {
        hub.broadcast(&WireMessage::new("Tick", i), None).await;
        next(&mut fast_peer).await;
    }

    assert_eq!(hub.connection_count().await, 2);
    let snapshot = hub.metrics().snapshot();
    assert!(snapshot.payloads_dropped >= 1);
    assert_eq!(snapshot.saturation_disconnects, 0);
}

#[tokio::test]
async fn test_unregister_twice_is_same_as_once() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (a, peer_a) = join(&hub, 1, SinkMode::Recording).await;
    let (_b, _peer_b) = join(&hub, 2, SinkMode::Recording).await;

    hub.unregister(a).await;
    hub.unregister(a).await;
    hub.unregister(uuid::Uuid::new_v4()).await;

    assert_eq!(hub.connection_count().await, 1);
    wait_for_close(&peer_a).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(peer_a.close_count(), 1);
    assert_eq!(hub.metrics().snapshot().connections_closed, 1);
}

#[tokio::test]
async fn test_peer_close_removes_connection() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_a, peer_a) = join(&hub, 1, SinkMode::Recording).await;
    let (_b, _peer_b) = join(&hub, 2, SinkMode::Recording).await;

    peer_a.frames.send(Ok(InboundFrame::Text("hello".into()))).unwrap();
    peer_a.frames.send(Ok(InboundFrame::Close)).unwrap();

    wait_for_count(&hub, 1).await;
    wait_for_close(&peer_a).await;
    assert_eq!(hub.metrics().snapshot().messages_received, 1);
}

#[tokio::test]
async fn test_read_error_removes_connection() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_a, peer_a) = join(&hub, 1, SinkMode::Recording).await;

    peer_a
        .frames
        .send(Err(crate::error::FrameError::Closed))
        .unwrap();

    wait_for_count(&hub, 0).await;
}

#[tokio::test]
async fn test_write_failure_removes_connection() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_broken, broken_peer) = join(&hub, 1, SinkMode::Failing).await;
    let (_ok, mut ok_peer) = join(&hub, 2, SinkMode::Recording).await;

    hub.broadcast(&WireMessage::post_created("x"), None).await;

    next(&mut ok_peer).await;
    wait_for_count(&hub, 1).await;
    wait_for_close(&broken_peer).await;
}

#[tokio::test]
async fn test_unserializable_broadcast_is_dropped() {
    use std::collections::HashMap;

    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_a, mut peer_a) = join(&hub, 1, SinkMode::Recording).await;

    let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
    bad.insert((1, 2), 3);
    hub.broadcast(&bad, None).await;
    hub.broadcast(&WireMessage::post_created("ok"), None).await;

    let payload = next(&mut peer_a).await;
    assert_eq!(&payload[..], br#"{"type":"Post_Created","payload":"ok"}"#);
    let snapshot = hub.metrics().snapshot();
    assert_eq!(snapshot.broadcasts_dropped, 1);
    assert_eq!(snapshot.broadcasts, 1);
}

#[tokio::test]
async fn test_shutdown_closes_connections_and_refuses_new_ones() {
    let hub = Hub::spawn(&RealtimeConfig::default());
    let (_a, peer_a) = join(&hub, 1, SinkMode::Recording).await;

    hub.shutdown().await;
    wait_for_close(&peer_a).await;
    assert!(hub.is_closed());

    let (connection, _peer) = testing::connection(2, SinkMode::Recording);
    let err = hub.register(connection).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(hub.connection_count().await, 0);

    hub.shutdown().await;
}

#[tokio::test]
async fn test_runner_stops_when_last_handle_dropped() {
    let (hub, runner) = Hub::new(&RealtimeConfig::default());
    let task = tokio::spawn(runner.run());
    let (_a, peer_a) = join(&hub, 1, SinkMode::Recording).await;

    drop(hub);

    timeout(WAIT, task).await.unwrap().unwrap();
    wait_for_close(&peer_a).await;
}
