//! Superthread API client implementation.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use superthread_core::{ApiClient, ApiRequest, Error, HttpMethod, Result, UpstreamError};
use tracing::{debug, info, warn};

use crate::DEFAULT_SUPERTHREAD_URL;

/// Superthread REST API client.
///
/// Holds no per-caller state: the bearer token travels with each request.
pub struct SuperthreadClient {
    base_url: String,
    client: reqwest::Client,
}

impl SuperthreadClient {
    /// Create a client for the public Superthread API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_SUPERTHREAD_URL)
    }

    /// Create a client with a custom base URL (self-hosted proxies, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("superthread-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default headers followed by the caller's; later inserts win.
    fn headers(&self, token: &str, extra: &[(String, String)]) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Validation(format!("Invalid header name '{}': {}", name, e)))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }

    /// Parse a response body, mapping non-2xx statuses to upstream errors.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Option<Value>> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                body,
            ));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| Error::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Validation(format!("Invalid header value: {}", e)))
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl ApiClient for SuperthreadClient {
    async fn request(&self, request: ApiRequest, token: &str) -> Result<Option<Value>> {
        if token.is_empty() {
            return Err(Error::MissingToken);
        }

        let ApiRequest {
            method,
            endpoint,
            body,
            headers,
        } = request;

        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.headers(token, &headers)?;

        info!(
            endpoint = %endpoint,
            method = %method,
            url = %url,
            "api_call_start"
        );
        let started = Instant::now();

        let mut builder = self
            .client
            .request(to_reqwest_method(method), &url)
            .headers(headers);
        if let Some(body) = &body {
            debug!(endpoint = %endpoint, body = %body, "Superthread request body");
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    method = %method,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "api_call_error"
                );
                return Err(UpstreamError::Transport(e.to_string()).into());
            }
        };

        let status = response.status().as_u16();
        let result = self.handle_response(response).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                endpoint = %endpoint,
                method = %method,
                status = status,
                duration_ms = duration_ms,
                "api_call_success"
            ),
            Err(e) => warn!(
                endpoint = %endpoint,
                method = %method,
                status = status,
                duration_ms = duration_ms,
                error = %e,
                "api_call_error"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = SuperthreadClient::with_base_url("http://localhost:9999/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }

    #[test]
    fn test_default_base_url() {
        let client = SuperthreadClient::new().unwrap();
        assert_eq!(client.base_url(), "https://api.superthread.com/v1");
    }

    #[test]
    fn test_caller_headers_replace_defaults() {
        let client = SuperthreadClient::new().unwrap();
        let headers = client
            .headers(
                "stp-token",
                &[("content-type".to_string(), "text/plain".to_string())],
            )
            .unwrap();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer stp-token");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_invalid_header_name() {
        let client = SuperthreadClient::new().unwrap();
        let result = client.headers("stp-token", &[("bad header".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_token_fails_before_network() {
        // Nothing listens on this port; reaching the network would yield an upstream error.
        let client = SuperthreadClient::with_base_url("http://127.0.0.1:1").unwrap();
        let result = client.request(ApiRequest::get("/users/me"), "").await;
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream() {
        let client = SuperthreadClient::with_base_url("http://127.0.0.1:1").unwrap();
        let err = client
            .request(ApiRequest::get("/users/me"), "stp-token")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.upstream_status(), None);
    }

    mod integration {
        use super::*;
        use httpmock::prelude::*;

        fn create_test_client(server: &MockServer) -> SuperthreadClient {
            SuperthreadClient::with_base_url(server.base_url()).unwrap()
        }

        #[tokio::test]
        async fn test_get_sends_bearer_token() {
            let server = MockServer::start();

            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/users/me")
                    .header("Authorization", "Bearer stp-abc123")
                    .header("Content-Type", "application/json");
                then.status(200)
                    .json_body(json!({"user": {"id": "u1", "teams": []}}));
            });

            let client = create_test_client(&server);
            let result = client
                .request(ApiRequest::get("/users/me"), "stp-abc123")
                .await
                .unwrap();

            mock.assert();
            assert_eq!(result, Some(json!({"user": {"id": "u1", "teams": []}})));
        }

        #[tokio::test]
        async fn test_post_sends_json_body() {
            let server = MockServer::start();

            let mock = server.mock(|when, then| {
                when.method(POST)
                    .path("/t1/cards")
                    .json_body(json!({"title": "New card", "list_id": "l1"}));
                then.status(200).json_body(json!({"card": {"id": "c1"}}));
            });

            let client = create_test_client(&server);
            let result = client
                .request(
                    ApiRequest::post("/t1/cards", json!({"title": "New card", "list_id": "l1"})),
                    "stp-abc123",
                )
                .await
                .unwrap();

            mock.assert();
            assert_eq!(result.unwrap()["card"]["id"], "c1");
        }

        #[tokio::test]
        async fn test_query_string_is_forwarded() {
            let server = MockServer::start();

            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/t1/tags")
                    .query_param("project_id", "p1");
                then.status(200).json_body(json!({"tags": []}));
            });

            let client = create_test_client(&server);
            client
                .request(ApiRequest::get("/t1/tags?project_id=p1"), "stp-abc123")
                .await
                .unwrap();

            mock.assert();
        }

        #[tokio::test]
        async fn test_no_content_returns_none() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(DELETE).path("/t1/cards/c1");
                then.status(204);
            });

            let client = create_test_client(&server);
            let result = client
                .request(ApiRequest::delete("/t1/cards/c1"), "stp-abc123")
                .await
                .unwrap();

            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_not_found_carries_status_and_body() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/t1/cards/missing");
                then.status(404).body("{\"message\":\"Card not found\"}");
            });

            let client = create_test_client(&server);
            let err = client
                .request(ApiRequest::get("/t1/cards/missing"), "stp-abc123")
                .await
                .unwrap_err();

            match err {
                Error::Upstream(UpstreamError::Status {
                    status,
                    ref status_text,
                    ref body,
                }) => {
                    assert_eq!(status, 404);
                    assert_eq!(status_text, "Not Found");
                    assert!(body.contains("Card not found"));
                }
                other => panic!("Expected upstream status error, got {:?}", other),
            }
            assert!(err.to_string().starts_with("API request failed: 404 Not Found"));
        }

        #[tokio::test]
        async fn test_server_error_is_upstream() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(PATCH).path("/t1/cards/c1");
                then.status(500).body("boom");
            });

            let client = create_test_client(&server);
            let err = client
                .request(
                    ApiRequest::patch("/t1/cards/c1", json!({"archived": true})),
                    "stp-abc123",
                )
                .await
                .unwrap_err();

            assert_eq!(err.upstream_status(), Some(500));
        }

        #[tokio::test]
        async fn test_caller_header_wins() {
            let server = MockServer::start();

            let mock = server.mock(|when, then| {
                when.method(POST)
                    .path("/t1/notes")
                    .header("Content-Type", "application/vnd.superthread+json");
                then.status(200).json_body(json!({"note": {"id": "n1"}}));
            });

            let client = create_test_client(&server);
            let request = ApiRequest::post("/t1/notes", json!({"title": "n"}))
                .with_header("Content-Type", "application/vnd.superthread+json");
            client.request(request, "stp-abc123").await.unwrap();

            mock.assert();
        }

        #[tokio::test]
        async fn test_invalid_json_body() {
            let server = MockServer::start();

            server.mock(|when, then| {
                when.method(GET).path("/users/me");
                then.status(200).body("<html>not json</html>");
            });

            let client = create_test_client(&server);
            let err = client
                .request(ApiRequest::get("/users/me"), "stp-abc123")
                .await
                .unwrap_err();

            assert!(matches!(err, Error::InvalidResponse(_)));
        }
    }
}
