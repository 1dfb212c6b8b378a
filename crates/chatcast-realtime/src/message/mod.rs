//! Wire message definition and serialization.

pub mod serializer;
pub mod types;

/// A serialized message, shared by reference across every recipient.
pub type Payload = bytes::Bytes;
