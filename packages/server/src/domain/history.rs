//! MessageHistory trait 定義
//!
//! 新規参加者へのリプレイに使う、件数と経過時間で上限のある履歴のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::ChatMessage;

/// Bounded, TTL-expiring store of recently broadcast messages.
///
/// Every operation is atomic: the TTL sweep and the mutation or read that
/// follows it happen under one lock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// Append a message, evicting expired entries and the oldest entry on overflow
    async fn add(&self, message: ChatMessage);

    /// Snapshot of all still-valid messages, oldest first
    async fn get_all(&self) -> Vec<ChatMessage>;

    /// Evict expired entries, returning how many were removed
    async fn sweep(&self) -> usize;
}
