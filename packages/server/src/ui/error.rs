//! Server lifecycle errors.

use std::{io, net::SocketAddr, time::Duration};

use thiserror::Error;

/// Errors surfaced by [`super::Server::start`] and [`super::Server::stop`]
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The listener failed while serving
    #[error("Server error: {0}")]
    Serve(#[source] io::Error),

    #[error("Server has already been started")]
    AlreadyStarted,

    #[error("Server is not running")]
    NotRunning,

    #[error("Server has already been stopped")]
    AlreadyStopped,

    /// The listener did not finish in-flight requests in time
    #[error("Server did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}
