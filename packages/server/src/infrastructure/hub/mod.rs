//! Broadcast hub: the distribution queue between producers and the registry.
//!
//! `publish` feeds a bounded FIFO queue; a single fan-out task drains it and
//! runs one registry broadcast pass per message.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::{
    domain::{ChatMessage, ConnectionRegistry, MessagePublisher, PublishError},
    infrastructure::dto::websocket::WireMessage,
};

/// Capacity of the distribution queue; `publish` waits while it is full
pub const DISTRIBUTION_QUEUE_CAPACITY: usize = 256;

/// How long `close` waits for the fan-out task to drain in-flight messages
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Distribution point between incoming client messages and all live connections
pub struct BroadcastHub {
    registry: Arc<dyn ConnectionRegistry>,
    queue: Mutex<Option<mpsc::Sender<ChatMessage>>>,
    receiver: Mutex<Option<mpsc::Receiver<ChatMessage>>>,
    fan_out: Mutex<Option<JoinHandle<()>>>,
}

impl BroadcastHub {
    /// 新しい BroadcastHub を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self::with_capacity(registry, DISTRIBUTION_QUEUE_CAPACITY)
    }

    pub fn with_capacity(registry: Arc<dyn ConnectionRegistry>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            registry,
            queue: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
            fan_out: Mutex::new(None),
        }
    }

    /// Launch the fan-out task. Calling it again is a no-op.
    pub async fn start(&self) {
        let Some(rx) = self.receiver.lock().await.take() else {
            tracing::warn!("Fan-out loop already started");
            return;
        };
        let handle = tokio::spawn(fan_out_loop(rx, self.registry.clone()));
        *self.fan_out.lock().await = Some(handle);
    }

    /// Close the distribution queue and wait for the fan-out task to drain.
    ///
    /// Later `publish` calls fail with [`PublishError::Closed`].
    /// Returns `false` if the queue was already closed.
    pub async fn close(&self) -> bool {
        if self.queue.lock().await.take().is_none() {
            return false;
        }
        // Never started: nothing drains the queue
        self.receiver.lock().await.take();

        let handle = self.fan_out.lock().await.take();
        if let Some(mut handle) = handle {
            match tokio::time::timeout(DRAIN_TIMEOUT, &mut handle).await {
                Ok(Ok(())) => tracing::debug!("Fan-out loop drained"),
                Ok(Err(e)) => tracing::error!("Fan-out loop failed: {}", e),
                Err(_) => {
                    tracing::warn!(
                        "Fan-out loop did not drain within {:?}, aborting",
                        DRAIN_TIMEOUT
                    );
                    handle.abort();
                }
            }
        }
        true
    }

    /// Whether the queue still accepts messages
    #[cfg(test)]
    async fn is_open(&self) -> bool {
        self.queue.lock().await.is_some()
    }
}

#[async_trait]
impl MessagePublisher for BroadcastHub {
    async fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        // Clone the sender so the lock is not held while waiting for capacity
        let sender = self
            .queue
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(PublishError::Closed)?;
        sender.send(message).await.map_err(|_| PublishError::Closed)
    }
}

/// Drain the queue until every sender is gone, one broadcast pass per message
async fn fan_out_loop(
    mut rx: mpsc::Receiver<ChatMessage>,
    registry: Arc<dyn ConnectionRegistry>,
) {
    while let Some(message) = rx.recv().await {
        let json = match serde_json::to_string(&WireMessage::from(&message)) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                continue;
            }
        };
        let delivered = registry.broadcast(&json).await;
        tracing::debug!(
            "Broadcasted message from '{}' to {} connection(s)",
            message.origin(),
            delivered
        );
    }
    tracing::info!("Distribution queue closed, fan-out loop finished");
}
