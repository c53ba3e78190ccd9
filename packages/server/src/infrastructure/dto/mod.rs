//! Data Transfer Objects (DTOs) for the wire protocol.
//!
//! - `websocket`: WebSocket message DTOs (also returned by `GET /api/history`)
//! - `conversion`: DTO ↔ domain conversions

pub mod conversion;
pub mod websocket;
