//! ConnectionRegistry trait 定義
//!
//! 接続中のコネクション集合を管理するインターフェース。
//! UseCase 層と配信ループはこの trait に依存し、WebSocket の具体的な実装には依存しない。

use async_trait::async_trait;

use super::{Connection, ConnectionId, RegistryError};

/// Concurrency-safe set of live client connections.
///
/// Membership changes take an exclusive lock; fan-out passes share a read
/// lock and observe a consistent point-in-time membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection; fails once the registry has been closed
    async fn register(&self, id: ConnectionId, connection: Connection)
    -> Result<(), RegistryError>;

    /// Remove a connection. Removing an absent connection is a no-op.
    ///
    /// Returns `true` if the connection was registered.
    async fn unregister(&self, id: &ConnectionId) -> bool;

    /// One fan-out pass: queue `content` for every registered connection.
    ///
    /// Returns the number of connections the message was queued for.
    async fn broadcast(&self, content: &str) -> usize;

    /// Ask every connection to close, remove them all and refuse new ones.
    ///
    /// Returns the number of connections that were torn down.
    async fn close_all(&self) -> usize;

    /// Number of registered connections
    async fn count(&self) -> usize;
}
