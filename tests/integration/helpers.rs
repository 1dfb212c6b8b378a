//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use chatcast_api::AppState;
use chatcast_cache::CacheManager;
use chatcast_cache::memory::MemoryCacheProvider;
use chatcast_completion::{ChatMessage, CompletionClient};
use chatcast_core::config::AppConfig;
use chatcast_core::config::cache::MemoryCacheConfig;
use chatcast_core::error::AppError;
use chatcast_core::result::AppResult;
use chatcast_core::traits::cache::CacheStore;

/// Completion client that replays canned results and records every request.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<AppResult<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<AppResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent on each call so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("no scripted reply left")))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, including the hub
    pub state: AppState,
    /// Cache behind the conversation history
    pub store: Arc<dyn CacheStore>,
    /// The scripted completion backend
    pub completion: Arc<ScriptedCompletion>,
}

impl TestApp {
    /// Create a test application whose completion backend returns `replies` in order
    pub fn new(replies: Vec<AppResult<String>>) -> Self {
        Self::with_config(AppConfig::default(), replies)
    }

    pub fn with_config(config: AppConfig, replies: Vec<AppResult<String>>) -> Self {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig { max_capacity: 1000 },
            0,
        ));
        let cache = Arc::new(CacheManager::from_provider(Arc::clone(&store)));
        let completion = Arc::new(ScriptedCompletion::new(replies));

        let state = chatcast_api::app::assemble_state(
            config,
            cache,
            Arc::clone(&completion) as Arc<dyn CompletionClient>,
        );
        let router = chatcast_api::build_app(state.clone());

        Self {
            router,
            state,
            store,
            completion,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<&str>) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.unwrap_or_default().to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the app on an ephemeral port and return its address
    pub async fn spawn_server(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let app = chatcast_api::build_app(self.state.clone());

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        addr
    }

    /// Wait until the hub holds exactly `expected` connections
    pub async fn wait_for_connections(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.state.hub.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("hub never reached {expected} connections"));
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
