//! Upstream API seam.
//!
//! Tool handlers never talk to reqwest directly; they build an [`ApiRequest`]
//! and hand it to an [`ApiClient`] together with the caller's token. The
//! production implementation lives in `superthread-api`, tests substitute a
//! mock.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::Result;

/// HTTP verbs used against the Superthread API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single upstream call, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path plus optional query string, e.g. `/t1/cards/c1` or `/t1/tags?project_id=p1`.
    pub endpoint: String,
    pub body: Option<Value>,
    /// Extra headers; these replace the client defaults on conflict.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, endpoint).with_body(body)
    }

    pub fn patch(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, endpoint).with_body(body)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Authenticated access to the upstream REST API.
///
/// Returns `Ok(None)` for empty (204) responses. Implementations must reject
/// an empty token before touching the network.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(&self, request: ApiRequest, token: &str) -> Result<Option<Value>>;
}
