//! UseCase error types.

use thiserror::Error;

/// Errors while connecting a client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The server is shutting down and accepts no new connections
    #[error("Server is shutting down")]
    ShuttingDown,
}

/// Errors while sending a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// The distribution queue is closed; the message was still recorded in history
    #[error("Hub is closed, message was not broadcast")]
    HubClosed,
}
