//! Server state shared with request handlers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetHistoryUseCase, SendMessageUseCase,
};

/// Lifecycle of a [`super::Server`]: `Created → Running → Stopping → Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Running,
    Stopping,
    Stopped,
}

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetHistoryUseCase（履歴取得のユースケース）
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    /// Current lifecycle state of the server
    pub lifecycle: watch::Receiver<ServerState>,
}

impl AppState {
    /// Whether new WebSocket connections are accepted
    pub fn is_accepting(&self) -> bool {
        *self.lifecycle.borrow() == ServerState::Running
    }
}
