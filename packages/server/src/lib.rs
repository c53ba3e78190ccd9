//! Real-time broadcast hub.
//!
//! Clients connect over WebSocket, every message sent by one client is relayed
//! to all connected clients, and newcomers receive a bounded, time-limited
//! backlog of recent messages before live traffic.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
