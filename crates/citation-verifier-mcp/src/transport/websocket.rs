//! WebSocket transport: one JSON-RPC request per text frame, one
//! envelope back per request.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};

use crate::protocol::ProtocolHandler;

use super::framing;
use super::http::ServerState;

/// Upgrade `GET /mcp` to a WebSocket.
pub async fn handle_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let handler = state.handler.clone();
    ws.on_upgrade(move |socket| run_connection(socket, handler))
}

/// Serve one connection until the client leaves or sends something that
/// cannot be decoded. Either way only this connection ends.
async fn run_connection(mut socket: WebSocket, handler: ProtocolHandler) {
    tracing::info!("New MCP WebSocket connection established");

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => {
                tracing::info!("MCP WebSocket connection closed");
                return;
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!("WebSocket error: binary frames are not supported");
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
            Err(e) => {
                tracing::warn!("WebSocket error: {e}");
                return;
            }
        };

        let request = match framing::decode_message(&text) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
        };

        let response = handler.handle(request).await;
        let encoded = match framing::encode_response(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!("Failed to encode response: {e}");
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
        };

        if let Err(e) = socket.send(Message::Text(encoded)).await {
            tracing::warn!("WebSocket send failed: {e}");
            return;
        }
    }

    tracing::info!("MCP WebSocket connection closed");
}
