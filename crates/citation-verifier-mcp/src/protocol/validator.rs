//! JSON-RPC message validation at the transport boundary.

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

/// Reject requests that declare a JSON-RPC version other than 2.0.
/// A missing `jsonrpc` member is accepted.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    match request.jsonrpc.as_deref() {
        None | Some(JSONRPC_VERSION) => Ok(()),
        Some(other) => Err(McpError::InvalidRequest(format!(
            "Expected jsonrpc version \"{JSONRPC_VERSION}\", got \"{other}\""
        ))),
    }
}
