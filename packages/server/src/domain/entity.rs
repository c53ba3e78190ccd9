//! Entities.

use super::value_object::{DisplayTime, OriginHost, Payload};

/// One chat/event record, stamped by the hub on receipt.
///
/// Immutable once stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    payload: Payload,
    origin: OriginHost,
    time: DisplayTime,
}

impl ChatMessage {
    /// Stamp a payload with its origin host and arrival time
    pub fn stamp(payload: Payload, origin: OriginHost, time: DisplayTime) -> Self {
        Self {
            payload,
            origin,
            time,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn origin(&self) -> &OriginHost {
        &self.origin
    }

    pub fn time(&self) -> &DisplayTime {
        &self.time
    }
}
