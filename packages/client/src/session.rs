//! One WebSocket session against the hub.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run a session until the user quits or the connection drops.
///
/// Returns `Ok(())` when the input channel closes (the user asked to leave)
/// and `Err(ClientError::ConnectionLost)` when the server went away.
pub async fn run_client_session(
    url: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to {}", url);
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    print!("{}", MessageFormatter::format_text(&text));
                    redisplay_prompt();
                }
                Some(Ok(Message::Binary(data))) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection: {:?}", frame);
                    return Err(ClientError::ConnectionLost);
                }
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
                None => return Err(ClientError::ConnectionLost),
            },
            line = input.recv() => match line {
                Some(line) => {
                    let payload = json!({ "content": line }).to_string();
                    if let Err(e) = write.send(Message::Text(payload.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        return Err(ClientError::ConnectionLost);
                    }
                }
                None => {
                    // Best effort; the server drops us either way
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                }
            },
        }
    }
}
