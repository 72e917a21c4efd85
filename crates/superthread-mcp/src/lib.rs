//! MCP (Model Context Protocol) server for Superthread.
//!
//! This crate exposes the Superthread REST API to AI assistants as MCP tools,
//! over HTTP (`POST /mcp/app`) or stdio.

pub mod adapters;
pub mod handlers;
pub mod http;
pub mod prompts;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod testing;

pub use handlers::ToolHandler;
pub use http::{router, AppState};
pub use server::McpServer;
pub use transport::StdioTransport;
