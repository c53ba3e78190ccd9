//! Live connection handles held by the registry.

use std::net::SocketAddr;

use tokio::sync::{mpsc, oneshot};

/// Channel feeding serialized messages to one connection's writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// An open duplex channel to one client, as seen by the registry
///
/// The close request travels apart from the message queue so it is seen
/// ahead of any backlog.
#[derive(Debug)]
pub struct Connection {
    pub remote: SocketAddr,
    pub sender: PusherChannel,
    closer: oneshot::Sender<()>,
}

/// Receiving ends owned by the connection's writer task
#[derive(Debug)]
pub struct PusherInbox {
    pub messages: mpsc::UnboundedReceiver<String>,
    /// Resolves with `Ok(())` when the registry asks the connection to close,
    /// or with an error once the registry has dropped the connection.
    pub close: oneshot::Receiver<()>,
}

impl Connection {
    /// Create a connection handle and the inbox its writer task drains
    pub fn open(remote: SocketAddr) -> (Self, PusherInbox) {
        let (sender, messages) = mpsc::unbounded_channel();
        let (closer, close) = oneshot::channel();
        (
            Self {
                remote,
                sender,
                closer,
            },
            PusherInbox { messages, close },
        )
    }

    /// Ask the writer task to close the connection.
    ///
    /// Returns `false` if the writer task is already gone.
    pub fn close(self) -> bool {
        self.closer.send(()).is_ok()
    }
}
