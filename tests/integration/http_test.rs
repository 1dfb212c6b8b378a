//! Integration tests for the post-message and health endpoints.

mod helpers;

use http::StatusCode;

use chatcast_completion::{ChatMessage, ChatRole};
use chatcast_core::error::AppError;

#[tokio::test]
async fn test_post_message_returns_reply() {
    let app = helpers::TestApp::new(vec![Ok("hello there".to_string())]);

    let response = app.request("POST", "/", Some(r#"{"message":"hi"}"#)).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "hello there");

    let calls = app.completion.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![ChatMessage::user("hi")]);
    assert_eq!(app.state.hub.metrics().snapshot().broadcasts, 1);
}

#[tokio::test]
async fn test_history_carries_across_posts() {
    let app = helpers::TestApp::new(vec![Ok("one".to_string()), Ok("two".to_string())]);

    app.request("POST", "/", Some(r#"{"message":"first"}"#)).await;
    let response = app.request("POST", "/", Some(r#"{"message":"second"}"#)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let calls = app.completion.calls();
    let roles: Vec<ChatRole> = calls[1].iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]);
    assert_eq!(calls[1][1].content, "one");

    // Requests without connect info are keyed by the unspecified address.
    let stored = app.store.get("history:0.0.0.0").await.unwrap().unwrap();
    let saved: Vec<ChatMessage> = serde_json::from_str(&stored).unwrap();
    assert_eq!(saved.len(), 4);
    assert_eq!(saved[3], ChatMessage::assistant("two"));
}

#[tokio::test]
async fn test_history_is_trimmed() {
    let mut config = chatcast_core::config::AppConfig::default();
    config.completion.max_history_messages = 2;
    let app = helpers::TestApp::with_config(
        config,
        vec![Ok("a".to_string()), Ok("b".to_string())],
    );

    app.request("POST", "/", Some(r#"{"message":"x"}"#)).await;
    app.request("POST", "/", Some(r#"{"message":"y"}"#)).await;

    let stored = app.store.get("history:0.0.0.0").await.unwrap().unwrap();
    let saved: Vec<ChatMessage> = serde_json::from_str(&stored).unwrap();
    assert_eq!(saved, vec![ChatMessage::user("y"), ChatMessage::assistant("b")]);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = helpers::TestApp::new(vec![]);

    let response = app.request("POST", "/", Some("{not json")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(app.completion.calls().is_empty());
}

#[tokio::test]
async fn test_missing_or_blank_message_is_bad_request() {
    let app = helpers::TestApp::new(vec![]);

    let missing = app.request("POST", "/", Some(r#"{"text":"hi"}"#)).await;
    let blank = app.request("POST", "/", Some(r#"{"message":"   "}"#)).await;

    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert!(app.completion.calls().is_empty());
}

#[tokio::test]
async fn test_completion_failure_is_server_error() {
    let app = helpers::TestApp::new(vec![Err(AppError::external_service("model exploded"))]);

    let response = app.request("POST", "/", Some(r#"{"message":"hi"}"#)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(app.state.hub.metrics().snapshot().broadcasts, 0);
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    let app = helpers::TestApp::new(vec![Err(AppError::service_unavailable("timed out"))]);

    let response = app.request("POST", "/", Some(r#"{"message":"hi"}"#)).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.state.hub.metrics().snapshot().broadcasts, 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new(vec![]);

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new(vec![]);

    let response = app.request("GET", "/api/health/detailed", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["cache"], "connected");
    assert_eq!(response.body["data"]["ws_connections"], 0);
    assert!(response.body["data"]["hub"]["broadcasts"].is_u64());
}

#[tokio::test]
async fn test_ws_path_without_handshake_is_server_error() {
    let app = helpers::TestApp::new(vec![]);

    let response = app.request("GET", "/ws", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.state.hub.connection_count().await, 0);
}
