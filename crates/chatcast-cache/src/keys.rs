//! Cache key builders.
//!
//! Keys are unprefixed here; the Redis provider applies its configured
//! prefix on the way out.

/// Cache key for a client's conversation history.
pub fn conversation_history(client: &str) -> String {
    format!("history:{client}")
}
