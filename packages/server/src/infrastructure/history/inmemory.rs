//! InMemory MessageHistory 実装
//!
//! 到着順のリングバッファ（`VecDeque`）を一つの排他ロックで守ります。
//! 先頭が常に最古のエントリなので、TTL 掃除は先頭からの刈り込みで済みます。

use std::{collections::VecDeque, sync::Arc, time::Instant};

use async_trait::async_trait;
use hearth_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    config::HistoryConfig,
    domain::{ChatMessage, MessageHistory},
};

/// A message together with the instant it entered the log
#[derive(Debug, Clone)]
struct HistoryEntry {
    message: ChatMessage,
    created_at: Instant,
}

/// Bounded, TTL-expiring in-memory message log
pub struct InMemoryMessageHistory {
    entries: Mutex<VecDeque<HistoryEntry>>,
    config: HistoryConfig,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageHistory {
    /// 新しい InMemoryMessageHistory を作成
    pub fn new(config: HistoryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(config.capacity())),
            config,
            clock,
        }
    }

    /// Drop every leading entry whose age has reached the TTL.
    ///
    /// Entries are time-ordered, so the first fresh entry ends the sweep.
    fn evict_expired(&self, entries: &mut VecDeque<HistoryEntry>, now: Instant) -> usize {
        let ttl = self.config.ttl();
        let mut evicted = 0;
        while entries
            .front()
            .is_some_and(|entry| now.saturating_duration_since(entry.created_at) >= ttl)
        {
            entries.pop_front();
            evicted += 1;
        }
        evicted
    }
}

#[async_trait]
impl MessageHistory for InMemoryMessageHistory {
    async fn add(&self, message: ChatMessage) {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();
        self.evict_expired(&mut entries, now);

        if entries.len() >= self.config.capacity() {
            entries.pop_front();
        }
        entries.push_back(HistoryEntry {
            message,
            created_at: now,
        });
        tracing::debug!("History now holds {} message(s)", entries.len());
    }

    async fn get_all(&self) -> Vec<ChatMessage> {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();
        self.evict_expired(&mut entries, now);
        entries.iter().map(|entry| entry.message.clone()).collect()
    }

    async fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();
        self.evict_expired(&mut entries, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use hearth_shared::time::ManualClock;

    use crate::domain::{DisplayTime, OriginHost, Payload};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 件数上限（最古から追い出し）
    // - TTL による失効（読み出し時点で判定）
    // - 到着順の保持
    //
    // 【なぜこのテストが必要か】
    // - 新規参加者へのリプレイ内容はこの履歴だけで決まる
    // - 上限や失効の境界を誤ると古いメッセージが再送される
    // ========================================

    fn message(content: &str) -> ChatMessage {
        ChatMessage::stamp(
            Payload::from_text(content),
            OriginHost::from("127.0.0.1:9000".parse::<std::net::SocketAddr>().unwrap()),
            DisplayTime::from(&chrono::Local::now()),
        )
    }

    fn contents(messages: &[ChatMessage]) -> Vec<String> {
        messages
            .iter()
            .map(|m| m.payload().content().unwrap_or_default().to_string())
            .collect()
    }

    fn create_history(capacity: usize, ttl: Duration) -> (InMemoryMessageHistory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = HistoryConfig::new(capacity, ttl).unwrap();
        (InMemoryMessageHistory::new(config, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_get_all_on_empty_history() {
        // テスト項目: 空の履歴からは空のリストが返される
        // given (前提条件):
        let (history, _clock) = create_history(10, Duration::from_secs(10));

        // when (操作):
        let result = history.get_all().await;

        // then (期待する結果):
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_add_to_empty_history() {
        // テスト項目: 空の履歴に追加すると唯一のエントリになる
        // given (前提条件):
        let (history, _clock) = create_history(10, Duration::from_secs(10));

        // when (操作):
        history.add(message("a")).await;

        // then (期待する結果):
        assert_eq!(contents(&history.get_all().await), vec!["a"]);
    }

    #[tokio::test]
    async fn test_overflow_evicts_oldest_first() {
        // テスト項目: 容量を超えると最古のメッセージから追い出される
        // given (前提条件):
        let (history, _clock) = create_history(3, Duration::from_secs(10));

        // when (操作):
        for content in ["a", "b", "c", "d"] {
            history.add(message(content)).await;
        }

        // then (期待する結果):
        assert_eq!(contents(&history.get_all().await), vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_count_never_exceeds_capacity() {
        // テスト項目: どの時点でも件数は容量以下である
        // given (前提条件):
        let (history, _clock) = create_history(4, Duration::from_secs(10));

        for i in 0..20 {
            // when (操作):
            history.add(message(&i.to_string())).await;

            // then (期待する結果):
            let all = history.get_all().await;
            assert!(all.len() <= 4);
            assert_eq!(all.len(), (i + 1).min(4));
        }
    }

    #[tokio::test]
    async fn test_entries_expire_at_ttl() {
        // テスト項目: TTL 未満なら残り、TTL 以上で消える
        // given (前提条件):
        let (history, clock) = create_history(10, Duration::from_secs(1));
        history.add(message("x")).await;

        // when (操作): t=0.5s
        clock.advance(Duration::from_millis(500));

        // then (期待する結果):
        assert_eq!(contents(&history.get_all().await), vec!["x"]);

        // when (操作): t=1.1s
        clock.advance(Duration::from_millis(600));

        // then (期待する結果):
        assert!(history.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_entry_expires_exactly_at_ttl() {
        // テスト項目: 経過時間がちょうど TTL のエントリは返されない
        // given (前提条件):
        let (history, clock) = create_history(10, Duration::from_secs(1));
        history.add(message("x")).await;

        // when (操作):
        clock.advance(Duration::from_secs(1));

        // then (期待する結果):
        assert!(history.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_expiry_is_independent_of_later_adds() {
        // テスト項目: 後続の追加があっても古いエントリは自分の TTL で消える
        // given (前提条件):
        let (history, clock) = create_history(10, Duration::from_secs(10));
        history.add(message("old")).await;
        clock.advance(Duration::from_secs(6));
        history.add(message("new")).await;

        // when (操作):
        clock.advance(Duration::from_secs(5));

        // then (期待する結果):
        assert_eq!(contents(&history.get_all().await), vec!["new"]);
    }

    #[tokio::test]
    async fn test_sweep_reports_evicted_count() {
        // テスト項目: sweep は失効したエントリ数を返し、新しいものは残す
        // given (前提条件):
        let (history, clock) = create_history(10, Duration::from_secs(10));
        history.add(message("a")).await;
        history.add(message("b")).await;
        clock.advance(Duration::from_secs(5));
        history.add(message("c")).await;
        clock.advance(Duration::from_secs(5));

        // when (操作):
        let evicted = history.sweep().await;

        // then (期待する結果):
        assert_eq!(evicted, 2);
        assert_eq!(contents(&history.get_all().await), vec!["c"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_history() {
        // テスト項目: 返されたスナップショットを変更しても履歴には影響しない
        // given (前提条件):
        let (history, _clock) = create_history(10, Duration::from_secs(10));
        history.add(message("a")).await;

        // when (操作):
        let mut snapshot = history.get_all().await;
        snapshot.clear();

        // then (期待する結果):
        assert_eq!(contents(&history.get_all().await), vec!["a"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_capacity_and_total_order() {
        // テスト項目: 並行追加でも件数上限を守り、同一送信者の順序は保たれる
        // given (前提条件):
        let (history, _clock) = create_history(50, Duration::from_secs(10));
        let history = Arc::new(history);

        // when (操作):
        let mut handles = Vec::new();
        for writer in 0..4 {
            let history = history.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    history.add(message(&format!("{}-{}", writer, i))).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let all = contents(&history.get_all().await);
        assert_eq!(all.len(), 50);
        for writer in 0..4 {
            let sequence: Vec<usize> = all
                .iter()
                .filter_map(|c| c.strip_prefix(&format!("{}-", writer)))
                .map(|i| i.parse().unwrap())
                .collect();
            assert!(sequence.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
