//! HTTP transport.
//!
//! JSON-RPC over `POST /mcp/app`, plus health and OAuth discovery stubs that
//! remote MCP clients query before connecting. Tokens are never stored: the
//! bearer PAT of each request is forwarded upstream as-is.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::protocol::{IncomingMessage, JsonRpcError, JsonRpcResponse, RequestId};
use crate::server::{McpServer, SERVER_NAME};

/// Prefix of Superthread personal access tokens.
const TOKEN_PREFIX: &str = "stp-";

/// Shared state of the HTTP server.
pub struct AppState {
    pub server: Arc<McpServer>,
    /// Used when a request carries no Authorization header at all.
    pub fallback_token: Option<String>,
    /// Externally visible base URL advertised in OAuth metadata.
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self {
            server,
            fallback_token: None,
            public_url: None,
        }
    }

    pub fn with_fallback_token(mut self, token: Option<String>) -> Self {
        self.fallback_token = token;
        self
    }

    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        self.public_url = url.map(|u| u.trim_end_matches('/').to_string());
        self
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp/app", post(mcp_endpoint).fallback(not_found))
        .route("/health", get(health_check))
        .route(
            "/.well-known/oauth-authorization-server",
            get(authorization_server_metadata),
        )
        .route(
            "/.well-known/oauth-protected-resource",
            get(protected_resource_metadata),
        )
        .route("/oauth/register", post(register_client))
        .route("/oauth/token", post(issue_token))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Bind and serve until Ctrl+C.
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("MCP HTTP server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Extract a Superthread PAT from an Authorization header value.
///
/// Accepts `Bearer stp-...` (scheme case-insensitive) or a bare `stp-...`.
pub fn extract_bearer_token(header: Option<&str>) -> Option<String> {
    let value = header?.trim();

    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
        _ => value,
    };

    if token.len() > TOKEN_PREFIX.len() && token.starts_with(TOKEN_PREFIX) {
        Some(token.to_string())
    } else {
        None
    }
}

async fn mcp_endpoint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let auth_header = headers.get(header::AUTHORIZATION);
    let token = match auth_header {
        Some(value) => extract_bearer_token(value.to_str().ok()),
        None => state.fallback_token.clone(),
    };
    let Some(token) = token else {
        tracing::debug!(
            header_present = auth_header.is_some(),
            "Rejecting request without a valid token"
        );
        return rpc_error(StatusCode::UNAUTHORIZED, JsonRpcError::unauthorized());
    };

    let message = match serde_json::from_slice::<Value>(&body)
        .and_then(IncomingMessage::from_value)
    {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Rejecting unparseable JSON-RPC body: {}", e);
            return rpc_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                JsonRpcError::internal_server_error(),
            );
        }
    };

    match state.server.handle_message(message, &token).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn rpc_error(status: StatusCode, error: JsonRpcError) -> Response {
    (status, Json(JsonRpcResponse::error(RequestId::Null, error))).into_response()
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Public base URL: configured value, else derived from the Host header.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.clone();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}", host)
}

async fn authorization_server_metadata(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let base = base_url(&state, &headers);
    Json(json!({
        "issuer": base,
        "authorization_endpoint": format!("{}/oauth/authorize", base),
        "token_endpoint": format!("{}/oauth/token", base),
        "registration_endpoint": format!("{}/oauth/register", base),
        "response_types_supported": ["code"],
        "grant_types_supported": ["authorization_code", "refresh_token"],
        "code_challenge_methods_supported": ["S256"],
        "token_endpoint_auth_methods_supported": ["client_secret_post", "none"],
    }))
}

async fn protected_resource_metadata(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let base = base_url(&state, &headers);
    Json(json!({
        "resource": format!("{}/mcp/app", base),
        "authorization_servers": [base],
        "bearer_methods_supported": ["header"],
    }))
}

#[derive(Debug, Default, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    redirect_uris: Vec<String>,
    client_name: Option<String>,
}

async fn register_client(body: Bytes) -> impl IntoResponse {
    let request: RegisterRequest = serde_json::from_slice(&body).unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({
            "client_id": SERVER_NAME,
            "client_name": request.client_name.unwrap_or_else(|| SERVER_NAME.to_string()),
            "redirect_uris": request.redirect_uris,
            "grant_types": ["authorization_code", "refresh_token"],
            "response_types": ["code"],
            "token_endpoint_auth_method": "none",
        })),
    )
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    code: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
}

/// Hand back whichever PAT the client supplied as the access token.
async fn issue_token(Form(request): Form<TokenRequest>) -> Response {
    let pat = [request.code, request.client_secret, request.refresh_token]
        .into_iter()
        .flatten()
        .find(|v| v.starts_with(TOKEN_PREFIX) && v.len() > TOKEN_PREFIX.len());

    match pat {
        Some(pat) => Json(json!({
            "access_token": pat,
            "token_type": "Bearer",
            "refresh_token": pat,
        }))
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ToolHandler;
    use crate::testing::MockApi;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(client: MockApi, fallback: Option<&str>) -> Router {
        let server = McpServer::new(ToolHandler::new(Arc::new(client)));
        router(
            AppState::new(Arc::new(server))
                .with_fallback_token(fallback.map(String::from))
                .with_public_url(Some("https://mcp.example.com/".to_string())),
        )
    }

    fn rpc(body: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp/app")
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    const PING: &str = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token(Some("Bearer stp-abc123")),
            Some("stp-abc123".to_string())
        );
        assert_eq!(
            extract_bearer_token(Some("bearer   stp-abc123")),
            Some("stp-abc123".to_string())
        );
        assert_eq!(
            extract_bearer_token(Some("stp-raw")),
            Some("stp-raw".to_string())
        );
        assert_eq!(extract_bearer_token(Some("Bearer abc123")), None);
        assert_eq!(extract_bearer_token(Some("Bearer stp-")), None);
        assert_eq!(extract_bearer_token(Some("Basic stp-abc")), None);
        assert_eq!(extract_bearer_token(Some("")), None);
        assert_eq!(extract_bearer_token(None), None);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_server() {
        let mut client = MockApi::new();
        client
            .expect_request()
            .withf(|_, token| token == "stp-abc123")
            .times(1)
            .returning(|_, _| Ok(Some(json!({"id": "u1"}))));

        let response = app(client, None)
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"get_me"}}"#,
                Some("Bearer stp-abc123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], "a");
        assert_eq!(body["result"]["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = app(MockApi::new(), None).oneshot(rpc(PING, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({
                "jsonrpc": "2.0",
                "error": {
                    "code": -32600,
                    "message": "Missing or invalid Authorization header. Expected: Bearer stp-xxx"
                },
                "id": null
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized_even_with_fallback() {
        let response = app(MockApi::new(), Some("stp-configured"))
            .oneshot(rpc(PING, Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_fallback_token_when_header_absent() {
        let mut client = MockApi::new();
        client
            .expect_request()
            .withf(|_, token| token == "stp-configured")
            .times(1)
            .returning(|_, _| Ok(Some(json!({"id": "u1"}))));

        let response = app(client, Some("stp-configured"))
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_me"}}"#,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["result"].is_object());
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc("{not json", Some("Bearer stp-abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32603);
        assert_eq!(body["error"]["message"], "Internal server error");
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_token_checked_before_body() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc("{not json", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_non_object_body() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc("[1, 2]", Some("Bearer stp-abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_method_is_method_not_found() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc(r#"{"jsonrpc":"2.0","id":1}"#, Some("Bearer stp-abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_jsonrpc_field_is_optional() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc(r#"{"id":1,"method":"tools/list"}"#, Some("Bearer stp-abc123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], 1);
        assert!(body["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_idless_tool_call_is_executed() {
        let mut client = MockApi::new();
        client
            .expect_request()
            .times(1)
            .returning(|_, _| Ok(Some(json!({"id": "u1"}))));

        let response = app(client, None)
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"get_me"}}"#,
                Some("Bearer stp-abc123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["result"]["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let response = app(MockApi::new(), None)
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                Some("Bearer stp-abc123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_jsonrpc_errors_use_status_200() {
        let mut client = MockApi::new();
        client.expect_request().never();

        let response = app(client, None)
            .oneshot(rpc(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nope"}}"#,
                Some("Bearer stp-abc123"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_not_found() {
        let app = app(MockApi::new(), None);

        let get_mcp = app
            .clone()
            .oneshot(Request::builder().uri("/mcp/app").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(get_mcp.status(), StatusCode::NOT_FOUND);

        let other = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::NOT_FOUND);
        let body = other.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Not Found");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(MockApi::new(), None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "superthread-mcp");
    }

    #[tokio::test]
    async fn test_oauth_metadata_uses_public_url() {
        let response = app(MockApi::new(), None)
            .oneshot(
                Request::builder()
                    .uri("/.well-known/oauth-authorization-server")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["issuer"], "https://mcp.example.com");
        assert_eq!(body["token_endpoint"], "https://mcp.example.com/oauth/token");
    }

    #[tokio::test]
    async fn test_protected_resource_from_host_header() {
        let server = McpServer::new(ToolHandler::new(Arc::new(MockApi::new())));
        let app = router(AppState::new(Arc::new(server)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/.well-known/oauth-protected-resource")
                    .header("host", "localhost:8787")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["resource"], "http://localhost:8787/mcp/app");
    }

    #[tokio::test]
    async fn test_register_echoes_redirect_uris() {
        let response = app(MockApi::new(), None)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/oauth/register")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"redirect_uris":["http://localhost/cb"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await["redirect_uris"],
            json!(["http://localhost/cb"])
        );
    }

    fn token_request(form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/oauth/token")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_token_echoes_pat() {
        let response = app(MockApi::new(), None)
            .oneshot(token_request("grant_type=authorization_code&code=stp-abc123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["access_token"], "stp-abc123");
        assert_eq!(body["token_type"], "Bearer");
    }

    #[tokio::test]
    async fn test_token_without_pat() {
        let response = app(MockApi::new(), None)
            .oneshot(token_request("grant_type=authorization_code&code=xyz"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "invalid_grant"}));
    }
}
