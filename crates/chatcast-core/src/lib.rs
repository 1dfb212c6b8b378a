//! # chatcast-core
//!
//! Core crate for Chatcast. Contains configuration schemas, the unified
//! error system, and the traits implemented by external collaborators
//! (cache stores).
//!
//! This crate has **no** internal dependencies on other Chatcast crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
