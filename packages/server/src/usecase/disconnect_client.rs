//! UseCase: クライアント切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Remove the connection from the registry.
    ///
    /// Safe to race with shutdown's bulk teardown: returns `false` when the
    /// connection was already gone.
    pub async fn execute(&self, id: &ConnectionId) -> bool {
        self.registry.unregister(id).await
    }
}
