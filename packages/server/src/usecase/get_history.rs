//! UseCase: 履歴取得処理

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageHistory};

/// 現在有効な履歴を取得するユースケース
pub struct GetHistoryUseCase {
    history: Arc<dyn MessageHistory>,
}

impl GetHistoryUseCase {
    pub fn new(history: Arc<dyn MessageHistory>) -> Self {
        Self { history }
    }

    pub async fn execute(&self) -> Vec<ChatMessage> {
        self.history.get_all().await
    }
}
