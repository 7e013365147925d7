//! Tool registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};
use crate::verification::VerificationAdapter;

use super::verify_citation;

/// A resolved tool handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    VerifyCitation,
}

impl Tool {
    pub async fn execute(
        self,
        arguments: Value,
        adapter: &VerificationAdapter,
    ) -> McpResult<ToolCallResult> {
        match self {
            Tool::VerifyCitation => verify_citation::execute(arguments, adapter).await,
        }
    }
}

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![verify_citation::definition()]
    }

    pub fn resolve(name: &str) -> McpResult<Tool> {
        match name {
            verify_citation::NAME => Ok(Tool::VerifyCitation),
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        adapter: &VerificationAdapter,
    ) -> McpResult<ToolCallResult> {
        let tool = Self::resolve(name)?;
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));
        tool.execute(args, adapter).await
    }
}
