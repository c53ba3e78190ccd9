//! Value objects.

use std::{fmt, net::SocketAddr};

use chrono::{DateTime, Local};
use hearth_shared::time::format_display_time;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Keys the hub stamps on every message; client-supplied values are dropped.
pub const RESERVED_KEYS: [&str; 2] = ["origin", "time"];

/// Key used when wrapping plain text into a payload
pub const CONTENT_KEY: &str = "content";

/// Identity of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh, unique connection ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Host portion of a remote address (no port)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginHost(String);

impl OriginHost {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SocketAddr> for OriginHost {
    fn from(addr: SocketAddr) -> Self {
        Self(addr.ip().to_string())
    }
}

impl fmt::Display for OriginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arrival time rendered as `HH:MM` on the local clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTime(String);

impl DisplayTime {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&DateTime<Local>> for DisplayTime {
    fn from(time: &DateTime<Local>) -> Self {
        Self(format_display_time(time))
    }
}

/// Application-defined message content.
///
/// Always a JSON object that never contains the reserved stamp keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Build a payload from an inbound JSON object, dropping reserved keys
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            object.remove(key);
        }
        Self(object)
    }

    /// Wrap arbitrary text as `{"content": text}`
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut object = Map::new();
        object.insert(CONTENT_KEY.to_string(), Value::String(text.into()));
        Self(object)
    }

    /// The `content` field, if it is a string
    pub fn content(&self) -> Option<&str> {
        self.0.get(CONTENT_KEY).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
