//! WebSocket handler for live dashboard updates

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::api::AppContext;
use crate::hub::Session;

/// Handles WebSocket upgrade requests for dashboard clients
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(ctx): State<Arc<AppContext>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

/// Handles an established WebSocket connection
async fn handle_socket(socket: WebSocket, ctx: Arc<AppContext>) {
    let (mut sender, mut receiver) = socket.split();
    let max_message_bytes = ctx.config.server.max_message_bytes;

    // Register and queue the late-join replay before anything else runs.
    let mut session: Session = ctx.hub.connect();
    let session_id = session.id();

    // Forward queued updates to the socket; the session deregisters on drop.
    let mut send_task = tokio::spawn(async move {
        while let Some(update) = session.recv().await {
            let json = match serde_json::to_string(&update) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(channel = %update.channel, "Failed to serialize update: {}", e);
                    continue;
                }
            };

            // Skip oversized messages instead of truncating to avoid malformed JSON
            if json.len() > max_message_bytes {
                tracing::warn!(
                    channel = %update.channel,
                    bytes = json.len(),
                    limit = max_message_bytes,
                    "Update exceeds message size limit, skipping"
                );
                metrics::counter!("statusboard_messages_dropped_total", "reason" => "oversized")
                    .increment(1);
                continue;
            }

            if let Err(e) = sender.send(Message::Text(json)).await {
                tracing::debug!(session_id = %session.id(), error = %e, "WebSocket write failed");
                return;
            }
        }

        // Hub closed the session (shutdown).
        let _ = sender.send(Message::Close(None)).await;
    });

    // Drain incoming frames; clients are not expected to send data
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Whichever side ends first takes the other down with it
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(session_id = %session_id, "WebSocket connection closed");
}
