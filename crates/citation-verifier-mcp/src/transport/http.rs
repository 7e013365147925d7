//! HTTP transport: single-shot JSON-RPC over POST plus the service routes
//! that host the WebSocket and SSE front-ends.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::{framing, sse, websocket};

pub const SERVICE_NAME: &str = "citation-verifier-mcp";

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub handler: ProtocolHandler,
    pub keepalive_interval: Duration,
}

/// HTTP transport serving POST, WebSocket and SSE endpoints.
pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler, keepalive_interval: Duration) -> Self {
        Self {
            state: Arc::new(ServerState {
                handler,
                keepalive_interval,
            }),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind `addr` and serve until the process exits.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> McpResult<()> {
        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root).post(handle_message))
        .route("/messages", post(handle_message))
        .route("/health", get(handle_health))
        .route("/sse", get(sse::handle_sse))
        .route("/mcp", get(websocket::handle_upgrade))
        .layer(cors)
        .with_state(state)
}

/// Handle one JSON-RPC request. Bodies that do not decode are rejected
/// here and never reach the protocol handler.
async fn handle_message(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let decoded = std::str::from_utf8(&body)
        .map_err(|e| McpError::ParseError(e.to_string()))
        .and_then(framing::decode_message);

    let request = match decoded {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Rejected HTTP message: {e}");
            return reject(e);
        }
    };

    let response = state.handler.handle(request).await;
    AxumJson(response).into_response()
}

fn reject(error: McpError) -> Response {
    let status = match error {
        McpError::ParseError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, AxumJson(error.to_json_rpc_error(Some(RequestId::Null)))).into_response()
}

/// Health check endpoint.
async fn handle_health() -> AxumJson<serde_json::Value> {
    AxumJson(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

/// Service descriptor.
async fn handle_root() -> AxumJson<serde_json::Value> {
    AxumJson(json!({
        "name": "Citation Verifier MCP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "websocket": "/mcp",
            "sse": "/sse",
            "health": "/health",
        },
        "description": "Remote MCP server for citation verification",
    }))
}
