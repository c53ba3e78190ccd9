//! Message formatting for terminal display.

use hearth_server::infrastructure::dto::websocket::WireMessage;
use serde_json::Value;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an inbound text frame.
    ///
    /// Hub messages are shown as `[HH:MM] origin: content`; anything that
    /// does not look like one is shown raw.
    pub fn format_text(text: &str) -> String {
        match serde_json::from_str::<WireMessage>(text) {
            Ok(message) => Self::format_wire_message(&message),
            Err(_) => Self::format_raw_message(text),
        }
    }

    /// Format a stamped hub message
    pub fn format_wire_message(message: &WireMessage) -> String {
        let body = match message.content() {
            Some(content) => content.to_string(),
            // No string content: show the rest of the payload as JSON
            None => Value::Object(message.payload.clone()).to_string(),
        };
        format!("\n[{}] {}: {}\n", message.time, message.origin, body)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
