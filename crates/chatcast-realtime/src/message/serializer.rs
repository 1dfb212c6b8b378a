//! JSON serialization for outbound messages.

use serde::Serialize;

use super::Payload;

/// Serialize a message once into its canonical wire form.
pub fn encode<T: Serialize + ?Sized>(message: &T) -> Result<Payload, serde_json::Error> {
    serde_json::to_vec(message).map(Payload::from)
}
