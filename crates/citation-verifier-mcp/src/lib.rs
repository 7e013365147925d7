//! Citation Verifier MCP Server: DOI verification for LLM clients over
//! WebSocket, SSE, HTTP and stdio.

pub mod config;
pub mod probe;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;
pub mod verification;

pub use config::{ConfigOverrides, ServerConfig};
pub use protocol::ProtocolHandler;
pub use tools::ToolRegistry;
pub use transport::StdioTransport;
pub use verification::VerificationAdapter;
