//! Outbound wire message.

use serde::{Deserialize, Serialize};

/// Event type emitted when a new post (completion reply) is created.
pub const POST_CREATED: &str = "Post_Created";

/// JSON object sent to peers: `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Event discriminator, e.g. `"Post_Created"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Arbitrary event body.
    pub payload: serde_json::Value,
}

impl WireMessage {
    /// Build a message from any event type and payload.
    pub fn new(kind: impl Into<String>, payload: impl Into<serde_json::Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// A `Post_Created` event carrying the post text.
    pub fn post_created(content: impl Into<String>) -> Self {
        Self::new(POST_CREATED, content.into())
    }
}
