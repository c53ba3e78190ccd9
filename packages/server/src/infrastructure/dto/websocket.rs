//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message as it travels over the WebSocket.
///
/// The application payload is flattened next to the two fields the hub
/// stamps on receipt. Inbound values of `origin` and `time` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Sender's host, without port
    #[serde(default)]
    pub origin: String,
    /// Arrival time, `HH:MM` on the hub's local clock
    #[serde(default)]
    pub time: String,
}

impl WireMessage {
    /// The `content` field, if it is a string
    pub fn content(&self) -> Option<&str> {
        self.payload.get("content").and_then(Value::as_str)
    }
}
