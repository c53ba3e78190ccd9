//! UseCase layer: application operations composed from domain interfaces.

mod connect_client;
mod disconnect_client;
mod error;
mod get_history;
mod send_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, SendMessageError};
pub use get_history::GetHistoryUseCase;
pub use send_message::SendMessageUseCase;
