//! Core types, configuration, and error handling for superthread-mcp.
//!
//! This crate provides the foundational abstractions shared by the API client,
//! the response pipeline, and the MCP server.

pub mod client;
pub mod config;
pub mod error;

pub use client::{ApiClient, ApiRequest, HttpMethod};
pub use config::Config;
pub use error::{Error, Result, UpstreamError};
