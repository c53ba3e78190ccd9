//! WebSocket broadcast server: lifecycle, routing and connection handlers.

mod error;
mod handler;
mod server;
pub mod signal;
pub mod state;

pub use error::ServerError;
pub use server::Server;
pub use state::ServerState;
