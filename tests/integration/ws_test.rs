//! End-to-end tests: real listener, real WebSocket clients.

mod helpers;

use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

type Client = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn connect(addr: std::net::SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("WebSocket handshake failed");
    client
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let message = timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("read failed");
        if let Message::Text(text) = message {
            return text.as_str().to_owned();
        }
    }
}

#[tokio::test]
async fn test_post_is_broadcast_to_every_peer() {
    let app = helpers::TestApp::new(vec![Ok("the reply".to_string())]);
    let addr = app.spawn_server().await;

    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    app.wait_for_connections(2).await;

    let response = app.request("POST", "/", Some(r#"{"message":"hi"}"#)).await;
    assert_eq!(response.status, http::StatusCode::CREATED);

    let expected = r#"{"type":"Post_Created","payload":"the reply"}"#;
    assert_eq!(next_text(&mut first).await, expected);
    assert_eq!(next_text(&mut second).await, expected);
}

#[tokio::test]
async fn test_client_close_unregisters() {
    let app = helpers::TestApp::new(vec![]);
    let addr = app.spawn_server().await;

    let mut client = connect(addr).await;
    let _other = connect(addr).await;
    app.wait_for_connections(2).await;

    client.close(None).await.expect("close failed");
    app.wait_for_connections(1).await;

    let infos = app.state.hub.connections().await;
    assert_eq!(infos.len(), 1);
    assert!(infos[0].remote_addr.ip().is_loopback());
}

#[tokio::test]
async fn test_hub_shutdown_closes_clients() {
    let app = helpers::TestApp::new(vec![]);
    let addr = app.spawn_server().await;

    let mut client = connect(addr).await;
    app.wait_for_connections(1).await;

    app.state.hub.shutdown().await;

    let ended = timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "client was not disconnected");

    assert_eq!(app.state.hub.connection_count().await, 0);
}
