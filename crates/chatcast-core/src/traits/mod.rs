//! Traits implemented by external collaborators.

pub mod cache;

pub use cache::CacheStore;
