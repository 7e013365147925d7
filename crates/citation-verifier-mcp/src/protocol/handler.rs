//! Main request dispatcher: receives JSON-RPC messages, routes to handlers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::tools::ToolRegistry;
use crate::types::*;
use crate::verification::VerificationAdapter;

use super::negotiation::negotiate;

/// The protocol handler shared by every transport.
///
/// Holds no per-session state: each call to [`ProtocolHandler::handle`]
/// is independent, so one handler can serve any number of concurrent
/// connections.
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    adapter: Arc<VerificationAdapter>,
}

impl ProtocolHandler {
    pub fn new(adapter: Arc<VerificationAdapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &VerificationAdapter {
        &self.adapter
    }

    /// Dispatch one request and build its envelope. Never fails: every
    /// error, including a panic inside a tool, becomes an error envelope
    /// carrying the request's id.
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let outcome = AssertUnwindSafe(self.dispatch_request(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(McpError::InternalError(format!(
                    "handler panicked while processing {}",
                    request.method
                )))
            });

        match outcome {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                if e.code() == error_codes::INTERNAL_ERROR {
                    tracing::error!("Error handling message: {e}");
                } else {
                    tracing::debug!("Request {} rejected: {e}", request.method);
                }
                e.to_json_rpc_error(id)
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request).await,
            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let result = negotiate(request.params.as_ref());
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let call_params = ToolCallParams::from_params(request.params.as_ref());
        let name = call_params.name.unwrap_or_default();

        let result = ToolRegistry::call(&name, call_params.arguments, &self.adapter).await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}
