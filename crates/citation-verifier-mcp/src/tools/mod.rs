//! MCP tool implementations.

pub mod registry;
pub mod verify_citation;

pub use registry::{Tool, ToolRegistry};
