//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - レジストリへの登録と、新規クライアント向け履歴スナップショットの取得
//!
//! ### なぜこのテストが必要か
//! - 登録してから履歴を取得する順序が、リプレイ取りこぼしを防ぐ
//! - シャットダウン中の接続が拒否されることを保証する

use std::sync::Arc;

use crate::domain::{
    ChatMessage, Connection, ConnectionId, ConnectionRegistry, MessageHistory, RegistryError,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// ConnectionRegistry（接続集合の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessageHistory（履歴の抽象化）
    history: Arc<dyn MessageHistory>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, history: Arc<dyn MessageHistory>) -> Self {
        Self { registry, history }
    }

    /// クライアント接続を実行
    ///
    /// Registers the connection first, then returns the history snapshot
    /// to replay to it. Live messages broadcast after registration queue up
    /// behind the replay in the connection's own channel.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ChatMessage>)` - 新規クライアントに送る履歴（古い順）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        id: ConnectionId,
        connection: Connection,
    ) -> Result<Vec<ChatMessage>, ConnectError> {
        self.registry
            .register(id, connection)
            .await
            .map_err(|e| match e {
                RegistryError::Closed => ConnectError::ShuttingDown,
            })?;

        Ok(self.history.get_all().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use mockall::Sequence;

    use crate::domain::{
        DisplayTime, MockConnectionRegistry, MockMessageHistory, OriginHost, Payload,
    };

    fn connection() -> Connection {
        let remote: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let (connection, _inbox) = Connection::open(remote);
        connection
    }

    fn message(content: &str) -> ChatMessage {
        ChatMessage::stamp(
            Payload::from_text(content),
            OriginHost::from("127.0.0.1:9000".parse::<SocketAddr>().unwrap()),
            DisplayTime::from(&chrono::Local::now()),
        )
    }

    #[tokio::test]
    async fn test_connect_registers_then_returns_history() {
        // テスト項目: 登録後に履歴スナップショットが返される
        // given (前提条件):
        let mut seq = Sequence::new();
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_register()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let mut history = MockMessageHistory::new();
        history
            .expect_get_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| vec![message("a"), message("b")]);
        let usecase = ConnectClientUseCase::new(Arc::new(registry), Arc::new(history));

        // when (操作):
        let result = usecase.execute(ConnectionId::generate(), connection()).await;

        // then (期待する結果):
        let replay = result.unwrap();
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[0].payload().content(), Some("a"));
        assert_eq!(replay[1].payload().content(), Some("b"));
    }

    #[tokio::test]
    async fn test_connect_while_shutting_down() {
        // テスト項目: レジストリが閉じていれば接続は拒否され、履歴は読まれない
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_register()
            .returning(|_, _| Err(RegistryError::Closed));
        let mut history = MockMessageHistory::new();
        history.expect_get_all().never();
        let usecase = ConnectClientUseCase::new(Arc::new(registry), Arc::new(history));

        // when (操作):
        let result = usecase.execute(ConnectionId::generate(), connection()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ConnectError::ShuttingDown);
    }
}
