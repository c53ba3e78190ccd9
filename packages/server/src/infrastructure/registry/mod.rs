//! コネクションレジストリの実装
//!
//! - `websocket`: WebSocket の writer タスクへ送るチャネルを保持する実装

pub mod websocket;

pub use websocket::WebSocketConnectionRegistry;
