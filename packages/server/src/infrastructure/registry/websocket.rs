//! WebSocket を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続中コネクションの writer チャネル（`PusherChannel`）を管理
//! - ブロードキャスト時は読み取りロックの下でチャネルに積むだけで、ネットワーク I/O は行わない
//!
//! ## 設計ノート
//!
//! 実際のソケット書き込みはコネクションごとの writer タスク（`ui/handler/websocket.rs`）が行います。
//! ロックを保持したまま I/O で待つことはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, RegistryError};

#[derive(Default)]
struct Members {
    connections: HashMap<ConnectionId, Connection>,
    closed: bool,
}

/// WebSocket を使った ConnectionRegistry 実装
#[derive(Default)]
pub struct WebSocketConnectionRegistry {
    members: RwLock<Members>,
}

impl WebSocketConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register(
        &self,
        id: ConnectionId,
        connection: Connection,
    ) -> Result<(), RegistryError> {
        let mut members = self.members.write().await;
        if members.closed {
            return Err(RegistryError::Closed);
        }
        let remote = connection.remote;
        members.connections.insert(id, connection);
        tracing::debug!("Connection '{}' ({}) registered", id, remote);
        Ok(())
    }

    async fn unregister(&self, id: &ConnectionId) -> bool {
        let mut members = self.members.write().await;
        let removed = members.connections.remove(id).is_some();
        if removed {
            tracing::debug!("Connection '{}' unregistered", id);
        }
        removed
    }

    async fn broadcast(&self, content: &str) -> usize {
        let members = self.members.read().await;

        let mut delivered = 0;
        for (id, connection) in members.connections.iter() {
            // 一部の送信失敗は許容し、他のコネクションへの配信は続ける
            match connection.sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push message to connection '{}' ({}): {}",
                    id,
                    connection.remote,
                    e
                ),
            }
        }
        delivered
    }

    async fn close_all(&self) -> usize {
        let mut members = self.members.write().await;
        members.closed = true;

        let count = members.connections.len();
        for (id, connection) in members.connections.drain() {
            if !connection.close() {
                tracing::debug!("Connection '{}' already gone before close", id);
            }
        }
        count
    }

    async fn count(&self) -> usize {
        self.members.read().await.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{net::SocketAddr, time::Duration};

    use crate::domain::PusherInbox;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - register / unregister / broadcast / close_all
    // - 存在しないコネクションの削除が no-op であること
    // - 一部の送信失敗が他のコネクションへの配信を妨げないこと
    // ========================================

    fn connection() -> (Connection, PusherInbox) {
        let remote: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        Connection::open(remote)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection() {
        // テスト項目: 登録済みの全コネクションにメッセージが積まれる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, mut alice_rx) = connection();
        let (bob, mut bob_rx) = connection();
        registry.register(ConnectionId::generate(), alice).await.unwrap();
        registry.register(ConnectionId::generate(), bob).await.unwrap();

        // when (操作):
        let delivered = registry.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(alice_rx.messages.recv().await, Some("hello".to_string()));
        assert_eq!(bob_rx.messages.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のコネクションへの送信が失敗しても他には届き、失敗側は削除されない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, mut alice_rx) = connection();
        let (bob, bob_rx) = connection();
        registry.register(ConnectionId::generate(), alice).await.unwrap();
        registry.register(ConnectionId::generate(), bob).await.unwrap();
        drop(bob_rx);

        // when (操作):
        let delivered = registry.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(alice_rx.messages.recv().await, Some("hello".to_string()));
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_unregister_removes_connection() {
        // テスト項目: unregister するとブロードキャスト対象から外れる
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, mut alice_rx) = connection();
        let id = ConnectionId::generate();
        registry.register(id, alice).await.unwrap();

        // when (操作):
        let removed = registry.unregister(&id).await;
        let delivered = registry.broadcast("hello").await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(delivered, 0);
        assert!(alice_rx.messages.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_absent_connection_is_noop() {
        // テスト項目: 未登録のコネクションを削除してもエラーにならず、他に影響しない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, _alice_rx) = connection();
        registry.register(ConnectionId::generate(), alice).await.unwrap();

        // when (操作):
        let removed = registry.unregister(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_close_all_sends_close_and_refuses_new_connections() {
        // テスト項目: close_all は全コネクションに Close を送り、以降の登録を拒否する
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, alice_rx) = connection();
        let alice_id = ConnectionId::generate();
        registry.register(alice_id, alice).await.unwrap();

        // when (操作):
        let closed = registry.close_all().await;
        let (late, _late_rx) = connection();
        let result = registry.register(ConnectionId::generate(), late).await;

        // then (期待する結果):
        assert_eq!(closed, 1);
        assert_eq!(alice_rx.close.await, Ok(()));
        assert_eq!(result, Err(RegistryError::Closed));
        assert_eq!(registry.count().await, 0);
        // handler のクリーンアップと競合しても安全
        assert!(!registry.unregister(&alice_id).await);
    }

    #[tokio::test]
    async fn test_close_all_is_not_queued_behind_backlog() {
        // テスト項目: 未送信のメッセージが溜まっていても Close 要求は即座に届く
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (alice, mut alice_rx) = connection();
        registry.register(ConnectionId::generate(), alice).await.unwrap();
        for _ in 0..1000 {
            registry.broadcast("backlog").await;
        }

        // when (操作):
        registry.close_all().await;

        // then (期待する結果):
        let close = tokio::time::timeout(Duration::from_millis(100), &mut alice_rx.close).await;
        assert_eq!(close, Ok(Ok(())));
        assert_eq!(alice_rx.messages.len(), 1000);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_connections() {
        // テスト項目: 接続が無くてもエラーにならない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();

        // when (操作):
        let delivered = registry.broadcast("hello").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }
}
