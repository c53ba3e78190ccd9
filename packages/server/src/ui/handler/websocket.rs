//! WebSocket connection handlers.
//!
//! One handler runs per accepted connection: it registers the connection,
//! replays history to it, then runs a reader and a writer task until either
//! side finishes.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{
            CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::{
    domain::{ChatMessage, Connection, ConnectionId, Payload, PusherInbox},
    infrastructure::dto::websocket::WireMessage,
    ui::state::AppState,
};

/// Deadline for writing the close frame to one connection
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, StatusCode> {
    let ws = ws.map_err(|e| {
        tracing::error!("Error with WebSocket upgrade from {}: {}", remote, e);
        e.status()
    })?;

    if !state.is_accepting() {
        tracing::warn!("Server is not running. Rejecting connection from {}.", remote);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::error!("Error with WebSocket connection from {}: {}", remote, e);
        })
        .on_upgrade(move |socket| handle_socket(socket, state, remote)))
}

fn going_away() -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::AWAY,
        reason: "server shutting down".into(),
    }))
}

/// Write the going-away close frame, giving up after [`CLOSE_TIMEOUT`]
async fn send_going_away(sender: &mut SplitSink<WebSocket, Message>, remote: SocketAddr) {
    match tokio::time::timeout(CLOSE_TIMEOUT, sender.send(going_away())).await {
        Ok(Ok(())) => tracing::debug!("Closed connection to {}", remote),
        Ok(Err(e)) => tracing::warn!("Error with closing connection to {}: {}", remote, e),
        Err(_) => tracing::warn!(
            "Closing connection to {} timed out after {:?}",
            remote,
            CLOSE_TIMEOUT
        ),
    }
}

/// Spawns a task that receives messages from the inbox and pushes them to the WebSocket sender.
///
/// A failed write is logged and the task keeps going; the reader side is
/// responsible for noticing a dead connection. A close request jumps the
/// queue, cutting short a write stuck on a peer that stopped reading, and is
/// answered with a close frame bounded by [`CLOSE_TIMEOUT`]. The sink is
/// dropped when the task ends.
///
/// # Arguments
///
/// * `inbox` - Message queue and close request fed by the registry
/// * `sender` - WebSocket sink to send messages to this client
/// * `remote` - Remote address, for logging
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut inbox: PusherInbox,
    mut sender: SplitSink<WebSocket, Message>,
    remote: SocketAddr,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let json = tokio::select! {
                biased;
                requested = &mut inbox.close => {
                    // Err: the registry dropped the connection without a close request
                    if requested.is_ok() {
                        break;
                    }
                    return;
                }
                json = inbox.messages.recv() => match json {
                    Some(json) => json,
                    None => return,
                },
            };

            tokio::select! {
                biased;
                requested = &mut inbox.close => {
                    if requested.is_ok() {
                        break;
                    }
                    return;
                }
                result = sender.send(Message::Text(json.into())) => {
                    if let Err(e) = result {
                        tracing::error!("Error with writing message to {}: {}", remote, e);
                    }
                }
            }
        }

        send_going_away(&mut sender, remote).await;
    })
}

/// Write the history snapshot straight to the socket, oldest first
async fn replay_history(
    sender: &mut SplitSink<WebSocket, Message>,
    history: &[ChatMessage],
    remote: SocketAddr,
) {
    for message in history {
        let json = match serde_json::to_string(&WireMessage::from(message)) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize history message: {}", e);
                continue;
            }
        };
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            tracing::error!("Error with sending history to {}: {}", remote, e);
        }
    }
    tracing::debug!("Replayed {} history message(s) to {}", history.len(), remote);
}

/// Read inbound messages until the client goes away or the stream fails
async fn read_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    remote: SocketAddr,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("Error with reading from WebSocket {}: {}", remote, e);
                return;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from {}: {}", remote, text.as_str());

                let payload = Payload::parse(&text);
                if let Err(e) = state.send_message_usecase.execute(payload, remote).await {
                    tracing::warn!("Failed to send message from {}: {}", remote, e);
                }
            }
            Message::Close(frame) => {
                match frame {
                    Some(frame) if !is_expected_close(frame.code) => tracing::warn!(
                        "Client {} closed the connection with code {}: {}",
                        remote,
                        frame.code,
                        frame.reason.as_str()
                    ),
                    _ => tracing::info!("Client {} disconnected", remote),
                }
                return;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Binary(data) => {
                tracing::debug!("Ignoring {} byte binary frame from {}", data.len(), remote);
            }
            _ => {}
        }
    }
    tracing::info!("Client {} disconnected", remote);
}

/// Peer-initiated closes that are lifecycle events rather than failures
fn is_expected_close(code: u16) -> bool {
    matches!(code, close_code::NORMAL | close_code::AWAY)
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote: SocketAddr) {
    let id = ConnectionId::generate();
    let (mut sender, receiver) = socket.split();

    // Live messages queue up in the inbox while the history is replayed
    let (connection, mut inbox) = Connection::open(remote);

    let history = match state.connect_client_usecase.execute(id, connection).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("Rejecting connection from {}: {}", remote, e);
            send_going_away(&mut sender, remote).await;
            return;
        }
    };
    tracing::info!("Client with address {} connected as '{}'", remote, id);

    // A shutdown during replay must not wait on a peer that stopped reading
    let replayed = tokio::select! {
        biased;
        _ = &mut inbox.close => false,
        _ = replay_history(&mut sender, &history, remote) => true,
    };
    if !replayed {
        send_going_away(&mut sender, remote).await;
        return;
    }

    let mut send_task = pusher_loop(inbox, sender, remote);
    let mut recv_task = tokio::spawn(read_loop(receiver, state.clone(), remote));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state.disconnect_client_usecase.execute(&id).await {
        tracing::info!("Connection '{}' ({}) removed from registry", id, remote);
    }
}
