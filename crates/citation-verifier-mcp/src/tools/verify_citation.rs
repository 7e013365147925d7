//! Tool: verify_citation: Check a DOI against the Crossref registry.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};
use crate::verification::{AdapterError, VerificationAdapter};

pub const NAME: &str = "verify_citation";

#[derive(Debug, Deserialize)]
struct VerifyParams {
    doi: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: "Verify a DOI citation against the Crossref database. Detects potentially \
                      hallucinated citations by checking if DOIs exist and retrieving \
                      bibliographic metadata."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "doi": {
                    "type": "string",
                    "description": "The DOI to verify (e.g., '10.1038/nature12373'). Can include URL prefixes which will be automatically stripped."
                }
            },
            "required": ["doi"]
        }),
    }
}

/// Argument problems come back as tool output, not as a protocol error;
/// only an unavailable verifier escapes as `Err`.
pub async fn execute(args: Value, adapter: &VerificationAdapter) -> McpResult<ToolCallResult> {
    if !adapter.is_initialized() {
        return Err(AdapterError::Unavailable.into());
    }

    let params: VerifyParams = match serde_json::from_value(args) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Error in citation verification: {e}");
            return Ok(ToolCallResult::error(format!(
                "Error during citation verification: {e}"
            )));
        }
    };

    let result = adapter.verify(&params.doi).await?;
    Ok(ToolCallResult::text(VerificationAdapter::format(&result)))
}
