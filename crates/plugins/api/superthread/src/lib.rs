//! Superthread API client for superthread-mcp.
//!
//! Implements [`superthread_core::ApiClient`] on top of reqwest. One client is
//! built at startup and shared by every request; the caller's token is passed
//! per call.

mod client;

pub use client::SuperthreadClient;

/// Default Superthread API URL.
pub const DEFAULT_SUPERTHREAD_URL: &str = superthread_core::config::DEFAULT_API_URL;
