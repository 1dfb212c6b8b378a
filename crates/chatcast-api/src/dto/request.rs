//! Request DTOs.

use serde::{Deserialize, Serialize};

use chatcast_core::error::AppError;

/// Body of `POST /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// The user's message.
    pub message: String,
}

impl MessageRequest {
    /// Reject blank messages.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.message.trim().is_empty() {
            return Err(AppError::validation("Message is required"));
        }
        Ok(())
    }
}
