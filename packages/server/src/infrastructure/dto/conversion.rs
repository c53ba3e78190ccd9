//! Conversion logic between DTOs and domain entities.

use serde_json::{Map, Value};

use crate::domain::{ChatMessage, Payload};
use crate::infrastructure::dto::websocket::WireMessage;

// ========================================
// DTO → Domain
// ========================================

impl Payload {
    /// Parse an inbound text frame.
    ///
    /// A JSON object becomes the payload (stamp keys dropped); anything
    /// else is wrapped as `{"content": text}`.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Map<String, Value>>(text) {
            Ok(object) => Payload::from_object(object),
            Err(e) => {
                tracing::warn!("Failed to parse message as JSON object: {}", e);
                Payload::from_text(text)
            }
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            payload: message.payload().as_map().clone(),
            origin: message.origin().as_str().to_string(),
            time: message.time().as_str().to_string(),
        }
    }
}

impl From<ChatMessage> for WireMessage {
    fn from(message: ChatMessage) -> Self {
        WireMessage::from(&message)
    }
}
