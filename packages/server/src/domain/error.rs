//! Domain error types.

use thiserror::Error;

/// Connection registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry has been torn down and accepts no new connections
    #[error("Connection registry is closed")]
    Closed,
}

/// Message publishing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The distribution queue is closed
    #[error("Distribution queue is closed")]
    Closed,
}
