//! # chatcast-api
//!
//! HTTP API layer for Chatcast built on Axum.
//!
//! Provides the post-message endpoint, the WebSocket upgrade that feeds the
//! broadcast hub, health checks, request logging, CORS, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod socket;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
