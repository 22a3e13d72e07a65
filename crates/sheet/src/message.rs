//! Message envelope delivered to [`App::handle_message`](crate::App).
//!
//! Widget events, timers and posted messages all reach the app the same way.
//! The envelope records where a message came from so the app can tell a
//! timer tick from a button press carrying the same payload.

/// A message with the name of its source.
#[derive(Debug, Clone)]
pub struct MessageEnvelope<M> {
    /// The actual message payload.
    pub message: M,

    /// Where the message came from: a widget type name for input handled by
    /// the tree, or "AppContext", "Timer" and "Interval" for scheduled ones.
    pub sender_type: String,
}

impl<M> MessageEnvelope<M> {
    pub fn new(message: M, sender_type: &str) -> Self {
        Self {
            message,
            sender_type: sender_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_creation() {
        let envelope = MessageEnvelope::new("test", "Button");
        assert_eq!(envelope.message, "test");
        assert_eq!(envelope.sender_type, "Button");
    }
}
