//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信メッセージへの刻印（送信元ホスト、表示時刻）と、履歴・配信キューへの投入
//!
//! ### なぜこのテストが必要か
//! - 接続中のクライアントがいなくても履歴に残ることを保証する
//! - 配信キューが閉じていても履歴への記録は行われることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：刻印して履歴とキューの両方へ投入
//! - 異常系：配信キューが閉じている

use std::{net::SocketAddr, sync::Arc};

use hearth_shared::time::Clock;

use crate::domain::{
    ChatMessage, DisplayTime, MessageHistory, MessagePublisher, OriginHost, Payload,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessageHistory（履歴の抽象化）
    history: Arc<dyn MessageHistory>,
    /// MessagePublisher（配信キューの抽象化）
    publisher: Arc<dyn MessagePublisher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        history: Arc<dyn MessageHistory>,
        publisher: Arc<dyn MessagePublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            history,
            publisher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// Stamps the payload with the sender's host and the current display
    /// time, then submits it to the history and the distribution queue
    /// concurrently. Neither submission waits for the other.
    ///
    /// # Arguments
    ///
    /// * `payload` - 受信したメッセージ内容
    /// * `remote` - 送信元コネクションのアドレス（ポートは捨てられる）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 刻印済みのメッセージ
    /// * `Err(SendMessageError)` - 配信キューへの投入失敗
    pub async fn execute(
        &self,
        payload: Payload,
        remote: SocketAddr,
    ) -> Result<ChatMessage, SendMessageError> {
        let message = ChatMessage::stamp(
            payload,
            OriginHost::from(remote),
            DisplayTime::from(&self.clock.local_now()),
        );

        let ((), published) = tokio::join!(
            self.history.add(message.clone()),
            self.publisher.publish(message.clone())
        );
        published.map_err(|_| SendMessageError::HubClosed)?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use hearth_shared::time::ManualClock;

    use crate::domain::{MockMessageHistory, MockMessagePublisher, PublishError};

    fn create_clock() -> Arc<ManualClock> {
        let wall = Local.with_ymd_and_hms(2024, 1, 15, 15, 4, 0).single().unwrap();
        Arc::new(ManualClock::new(wall))
    }

    fn remote() -> SocketAddr {
        "192.168.1.7:53211".parse().unwrap()
    }

    #[tokio::test]
    async fn test_send_message_stamps_and_submits() {
        // テスト項目: 送信元ホストと表示時刻が刻印され、履歴とキューの両方に投入される
        // given (前提条件):
        let mut history = MockMessageHistory::new();
        history
            .expect_add()
            .withf(|m| m.origin().as_str() == "192.168.1.7" && m.time().as_str() == "15:04")
            .times(1)
            .returning(|_| ());
        let mut publisher = MockMessagePublisher::new();
        publisher
            .expect_publish()
            .withf(|m| m.payload().content() == Some("hi"))
            .times(1)
            .returning(|_| Ok(()));
        let usecase =
            SendMessageUseCase::new(Arc::new(history), Arc::new(publisher), create_clock());

        // when (操作):
        let result = usecase.execute(Payload::from_text("hi"), remote()).await;

        // then (期待する結果):
        let message = result.unwrap();
        assert_eq!(message.origin().as_str(), "192.168.1.7");
        assert_eq!(message.time().as_str(), "15:04");
        assert_eq!(message.payload().content(), Some("hi"));
    }

    #[tokio::test]
    async fn test_send_message_when_hub_closed_still_records_history() {
        // テスト項目: 配信キューが閉じていてもエラーを返しつつ履歴には記録される
        // given (前提条件):
        let mut history = MockMessageHistory::new();
        history.expect_add().times(1).returning(|_| ());
        let mut publisher = MockMessagePublisher::new();
        publisher
            .expect_publish()
            .returning(|_| Err(PublishError::Closed));
        let usecase =
            SendMessageUseCase::new(Arc::new(history), Arc::new(publisher), create_clock());

        // when (操作):
        let result = usecase.execute(Payload::from_text("hi"), remote()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), SendMessageError::HubClosed);
    }

    #[tokio::test]
    async fn test_send_message_uses_current_clock_time() {
        // テスト項目: 時計が進めば刻印される表示時刻も進む
        // given (前提条件):
        let clock = create_clock();
        clock.advance(std::time::Duration::from_secs(60 * 61));
        let mut history = MockMessageHistory::new();
        history.expect_add().returning(|_| ());
        let mut publisher = MockMessagePublisher::new();
        publisher.expect_publish().returning(|_| Ok(()));
        let usecase = SendMessageUseCase::new(Arc::new(history), Arc::new(publisher), clock);

        // when (操作):
        let message = usecase
            .execute(Payload::from_text("later"), remote())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.time().as_str(), "16:05");
    }
}
