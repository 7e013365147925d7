//! Transport layer for MCP communication.

pub mod framing;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod sse;
pub mod stdio;
#[cfg(feature = "http")]
pub mod websocket;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use stdio::StdioTransport;
