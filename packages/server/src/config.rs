//! Server configuration consumed at construction.

use std::{net::SocketAddr, num::NonZeroUsize, time::Duration};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("History time-to-live must be greater than zero")]
    ZeroHistoryTtl,

    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    #[error("Invalid listen address '{0}'")]
    InvalidListenAddr(String),
}

/// Limits of the message history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    capacity: NonZeroUsize,
    ttl: Duration,
}

impl HistoryConfig {
    /// Create a history configuration
    ///
    /// # Errors
    ///
    /// Rejects a zero capacity or a zero time-to-live.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroHistoryCapacity)?;
        if ttl.is_zero() {
            return Err(ConfigError::ZeroHistoryTtl);
        }
        Ok(Self { capacity, ttl })
    }

    /// Maximum number of retained messages
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Maximum age of a retained message
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    listen_addr: SocketAddr,
    history: HistoryConfig,
    sweep_interval: Option<Duration>,
}

impl ServerConfig {
    /// Create a server configuration
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    /// * `history` - History limits
    /// * `sweep_interval` - Period of the background TTL sweep, `None` to disable it
    pub fn new(
        host: &str,
        port: u16,
        history: HistoryConfig,
        sweep_interval: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = format!("{}:{}", host, port);
        let listen_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(bind_addr))?;
        if sweep_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(Self {
            listen_addr,
            history,
            sweep_interval,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    pub fn history(&self) -> HistoryConfig {
        self.history
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval
    }
}
