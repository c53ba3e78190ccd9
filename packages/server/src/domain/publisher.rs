//! MessagePublisher trait 定義

use async_trait::async_trait;

use super::{ChatMessage, PublishError};

/// Entry point of the distribution queue.
///
/// Messages are distributed in the order `publish` is called.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Enqueue a message for fan-out.
    ///
    /// May wait while the queue is full; fails fast once the queue is closed.
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError>;
}
