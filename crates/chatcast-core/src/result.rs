//! Convenience result type alias for Chatcast.

use crate::error::AppError;

/// A specialized `Result` type for Chatcast operations.
pub type AppResult<T> = Result<T, AppError>;
