//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop: reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        self.run_with(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC until `input` reaches EOF.
    pub async fn run_with<R, W>(&self, input: R, mut output: W) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(input);
        let mut line = String::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response = match framing::decode_message(trimmed) {
                Ok(request) if request.is_notification() => {
                    tracing::debug!("Notification: {}", request.method);
                    continue;
                }
                Ok(request) => self.handler.handle(request).await,
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    e.to_json_rpc_error(Some(RequestId::Null))
                }
            };

            let framed = framing::frame_message(&response)?;
            output
                .write_all(framed.as_bytes())
                .await
                .map_err(McpError::Io)?;
            output.flush().await.map_err(McpError::Io)?;
        }

        Ok(())
    }
}
