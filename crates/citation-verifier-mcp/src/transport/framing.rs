//! Decode/encode shims shared by every transport.

use serde_json::Value;

use crate::protocol::validator::validate_request;
use crate::types::{JsonRpcRequest, JsonRpcResponse, McpError, McpResult};

/// Parse raw text as a JSON-RPC request.
///
/// Text that is not JSON yields [`McpError::ParseError`]; JSON that does
/// not have the request shape yields [`McpError::InvalidRequest`].
pub fn decode_message(raw: &str) -> McpResult<JsonRpcRequest> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    decode_value(value)
}

/// Convert an already-parsed JSON value into a request.
pub fn decode_value(value: Value) -> McpResult<JsonRpcRequest> {
    let request: JsonRpcRequest =
        serde_json::from_value(value).map_err(|e| McpError::InvalidRequest(e.to_string()))?;
    validate_request(&request)?;
    Ok(request)
}

/// Serialize an envelope as compact JSON.
pub fn encode_response(response: &JsonRpcResponse) -> McpResult<String> {
    serde_json::to_string(response).map_err(McpError::Json)
}

/// Serialize an envelope to a JSON line (with trailing newline).
pub fn frame_message(response: &JsonRpcResponse) -> McpResult<String> {
    let mut json = encode_response(response)?;
    json.push('\n');
    Ok(json)
}
