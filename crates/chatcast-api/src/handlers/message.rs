//! Post-message handler: ask the completion backend and broadcast its reply.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::{info, warn};

use chatcast_completion::ChatMessage;
use chatcast_core::error::AppError;
use chatcast_realtime::WireMessage;

use crate::dto::request::MessageRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::ClientAddr;
use crate::state::AppState;

/// POST /
///
/// History is keyed by the caller's IP. The reply is broadcast to every
/// hub peer as `Post_Created` and returned with 201.
pub async fn post_message(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = body.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    request.validate()?;

    let client = addr.ip().to_string();
    let mut history = state.history.load(&client).await;
    history.push(ChatMessage::user(request.message));

    let reply = state.completion.complete(&history).await?;
    history.push(ChatMessage::assistant(reply.clone()));

    if let Err(e) = state.history.save(&client, &history).await {
        warn!(client = %client, error = %e, "Failed to save conversation history");
    }

    state
        .hub
        .broadcast(&WireMessage::post_created(reply.clone()), None)
        .await;

    info!(client = %client, reply_len = reply.len(), "Post created");
    Ok((StatusCode::CREATED, Json(MessageResponse { message: reply })))
}
