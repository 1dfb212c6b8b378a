//! Route handlers.

pub mod health;
pub mod message;
pub mod ws;
