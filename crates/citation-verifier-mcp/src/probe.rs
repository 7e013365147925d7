//! Remote smoke test for a deployed server.
//!
//! Launch with `citation-verifier-mcp probe --url ws://host:8000/mcp`.
//! Each check opens its own WebSocket connection, the way independent
//! MCP clients would.

use anyhow::{anyhow, Context};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub const DEFAULT_PROBE_URL: &str = "ws://localhost:8000/mcp";
pub const DEFAULT_PROBE_DOI: &str = "10.1038/nature12373";
pub const DEFAULT_INVALID_DOI: &str = "invalid-doi-format";

/// Outcome of one probe step.
#[derive(Debug, Clone)]
pub struct ProbeCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub checks: Vec<ProbeCheck>,
}

impl ProbeReport {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        !self.checks.is_empty() && self.passed() == self.checks.len()
    }

    fn record(&mut self, name: &'static str, outcome: anyhow::Result<String>) {
        let check = match outcome {
            Ok(detail) => ProbeCheck {
                name,
                passed: true,
                detail,
            },
            Err(e) => ProbeCheck {
                name,
                passed: false,
                detail: format!("{e:#}"),
            },
        };
        self.checks.push(check);
    }
}

/// Run every check against `url` and collect the results.
pub async fn run(url: &str, doi: &str, invalid_doi: &str) -> ProbeReport {
    let mut report = ProbeReport::default();

    report.record("connection", check_connection(url).await);
    report.record("tools/list", check_tools_list(url).await);
    report.record("verify valid DOI", check_verification(url, doi).await);
    report.record("verify invalid DOI", check_invalid(url, invalid_doi).await);

    report
}

/// Send one request on a fresh connection and return the parsed reply.
async fn round_trip(url: &str, request: Value) -> anyhow::Result<Value> {
    let (mut socket, _) = connect_async(url)
        .await
        .with_context(|| format!("connecting to {url}"))?;

    socket.send(Message::Text(request.to_string())).await?;

    let reply = loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => break text,
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(other)) => return Err(anyhow!("unexpected frame: {other:?}")),
            Some(Err(e)) => return Err(e.into()),
            None => return Err(anyhow!("connection closed before a reply")),
        }
    };

    let _ = socket.close(None).await;
    serde_json::from_str(&reply).context("reply is not JSON")
}

async fn check_connection(url: &str) -> anyhow::Result<String> {
    let (mut socket, _) = connect_async(url)
        .await
        .with_context(|| format!("connecting to {url}"))?;
    let _ = socket.close(None).await;
    Ok("connected".to_string())
}

async fn check_tools_list(url: &str) -> anyhow::Result<String> {
    let reply = round_trip(
        url,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {} }),
    )
    .await?;

    let tools = reply["result"]["tools"]
        .as_array()
        .ok_or_else(|| anyhow!("unexpected response format: {reply}"))?;
    if tools.is_empty() {
        return Err(anyhow!("server listed no tools"));
    }

    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    Ok(format!("{} tool(s): {}", tools.len(), names.join(", ")))
}

async fn check_verification(url: &str, doi: &str) -> anyhow::Result<String> {
    let reply = round_trip(url, call_request(2, doi)).await?;
    let text = reply["result"]["content"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow!("verification failed: {reply}"))?;
    Ok(preview(text))
}

async fn check_invalid(url: &str, doi: &str) -> anyhow::Result<String> {
    let reply = round_trip(url, call_request(3, doi)).await?;

    if let Some(message) = reply["error"]["message"].as_str() {
        return Ok(format!("error envelope: {message}"));
    }

    let text = reply["result"]["content"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow!("unexpected response: {reply}"))?;
    let lowered = text.to_lowercase();
    if ["error", "invalid", "not found"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        Ok(preview(text))
    } else {
        Err(anyhow!("unexpected success with invalid DOI: {}", preview(text)))
    }
}

fn call_request(id: i64, doi: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": "verify_citation", "arguments": { "doi": doi } }
    })
}

fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > 100 {
        format!("{}...", first_line.chars().take(100).collect::<String>())
    } else {
        first_line.to_string()
    }
}
