//! MCP `initialize` handshake.

use serde_json::{Map, Value};

use crate::types::{InitializeParams, InitializeResult, MCP_VERSION};

/// Acknowledge a client handshake.
///
/// The reply is fixed; client parameters are only inspected for logging,
/// and unreadable parameters are tolerated.
pub fn negotiate(params: Option<&Map<String, Value>>) -> InitializeResult {
    let params: InitializeParams = params
        .and_then(|p| serde_json::from_value(Value::Object(p.clone())).ok())
        .unwrap_or_default();

    if let Some(version) = params.protocol_version.as_deref() {
        if version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {version}, server supports {MCP_VERSION}. Proceeding with server version."
            );
        }
    }

    match &params.client_info {
        Some(info) => tracing::info!("Initialized with client: {} v{}", info.name, info.version),
        None => tracing::info!("Initialized with anonymous client"),
    }

    InitializeResult::default_result()
}
