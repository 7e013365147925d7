//! MCP request parameter types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of `tools/call`. Both fields are optional on the wire; a
/// missing name resolves to no tool, missing arguments to `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl ToolCallParams {
    /// Lenient extraction: a non-string `name` counts as missing.
    pub fn from_params(params: Option<&Map<String, Value>>) -> Self {
        let Some(params) = params else {
            return Self::default();
        };
        Self {
            name: params.get("name").and_then(Value::as_str).map(str::to_string),
            arguments: params.get("arguments").cloned(),
        }
    }
}
