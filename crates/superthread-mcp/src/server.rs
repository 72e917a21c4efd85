//! MCP server implementation.
//!
//! Stateless JSON-RPC dispatcher: every request carries the caller's token
//! and is answered independently, so the same server instance backs both the
//! HTTP endpoint and the stdio loop.

use serde_json::Value;

use crate::handlers::ToolHandler;
use crate::prompts::Prompts;
use crate::protocol::{
    IncomingMessage, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, PromptGetParams, PromptsCapability, PromptsListResult, RequestId,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, ToolsListResult, MCP_VERSION,
};
use crate::transport::StdioTransport;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "superthread-mcp";

/// MCP server for Superthread.
pub struct McpServer {
    handler: ToolHandler,
    prompts: Prompts,
}

impl McpServer {
    pub fn new(handler: ToolHandler) -> Self {
        Self {
            handler,
            prompts: Prompts,
        }
    }

    pub fn handler(&self) -> &ToolHandler {
        &self.handler
    }

    /// Serve newline-delimited JSON-RPC until EOF.
    pub async fn run(&self, transport: &mut StdioTransport, token: &str) -> std::io::Result<()> {
        tracing::info!(
            tools = self.handler.registry().len(),
            "Starting MCP server on stdio"
        );

        loop {
            match transport.read_message().await {
                Ok(Some(msg)) => {
                    if let Some(resp) = self.handle_message(msg, token).await {
                        if let Err(e) = transport.write_response(&resp).await {
                            tracing::error!("Failed to write response: {}", e);
                            return Err(e);
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!("EOF received, shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!("Transport error: {}", e);
                    let error_resp = JsonRpcResponse::error(
                        RequestId::Null,
                        JsonRpcError::parse_error(&e.to_string()),
                    );
                    transport.write_response(&error_resp).await?;
                }
            }
        }

        tracing::info!("MCP server stopped");
        Ok(())
    }

    /// Handle an incoming message. Notifications produce no response.
    pub async fn handle_message(&self, msg: IncomingMessage, token: &str) -> Option<JsonRpcResponse> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(req, token).await),
            IncomingMessage::Notification(notif) => {
                self.handle_notification(&notif.method);
                None
            }
            IncomingMessage::MissingMethod(id) => {
                tracing::warn!(?id, "Message without a method");
                Some(JsonRpcResponse::error(id, JsonRpcError::missing_method()))
            }
        }
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, req: JsonRpcRequest, token: &str) -> JsonRpcResponse {
        tracing::debug!("Handling request: {} (id: {:?})", req.method, req.id);

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req.id, req.params),
            "tools/list" => self.handle_tools_list(req.id),
            "tools/call" => self.handle_tools_call(req.id, req.params, token).await,
            "prompts/list" => self.handle_prompts_list(req.id),
            "prompts/get" => self.handle_prompts_get(req.id, req.params),
            "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
            method => {
                tracing::warn!("Unknown method: {}", method);
                JsonRpcResponse::error(req.id, JsonRpcError::method_not_found(method))
            }
        }
    }

    /// Handle notifications (no response).
    pub fn handle_notification(&self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialized");
            }
            "notifications/cancelled" => {
                tracing::debug!("Request cancelled by client");
            }
            _ => {
                tracing::debug!("Ignoring notification: {}", method);
            }
        }
    }

    fn handle_initialize(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(init_params) => {
                    tracing::info!(
                        "Client: {} v{} (protocol: {})",
                        init_params.client_info.name,
                        init_params.client_info.version,
                        init_params.protocol_version
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to parse initialize params: {}", e);
                }
            }
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.handler.available_tools(),
        };
        JsonRpcResponse::from_serializable(id, &result)
    }

    async fn handle_tools_call(
        &self,
        id: RequestId,
        params: Option<Value>,
        token: &str,
    ) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(&e.to_string()),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        let Some(tool) = self.handler.find(&params.name) else {
            tracing::warn!("Unknown tool: {}", params.name);
            return JsonRpcResponse::error(id, JsonRpcError::unknown_tool(&params.name));
        };

        tracing::info!("Calling tool: {}", params.name);

        match self.handler.execute(tool, params.arguments, token).await {
            Ok(result) => JsonRpcResponse::from_serializable(id, &result),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::tool_failed(&e.to_string())),
        }
    }

    fn handle_prompts_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = PromptsListResult {
            prompts: self.prompts.list(),
        };
        JsonRpcResponse::from_serializable(id, &result)
    }

    fn handle_prompts_get(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: PromptGetParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params(&e.to_string()));
            }
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        let arguments = params.arguments.unwrap_or_default();
        match self.prompts.get(&params.name, &arguments) {
            Ok(result) => JsonRpcResponse::from_serializable(id, &result),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::invalid_params(&e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{JsonRpcNotification, JSONRPC_VERSION};
    use crate::testing::MockApi;
    use serde_json::json;
    use std::sync::Arc;
    use superthread_core::Error;

    const TOKEN: &str = "stp-abc123";

    fn server(client: MockApi) -> McpServer {
        McpServer::new(ToolHandler::new(Arc::new(client)))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId::Number(1),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(MockApi::new());

        let resp = server
            .handle_request(
                request(
                    "initialize",
                    Some(json!({
                        "protocolVersion": "2025-03-26",
                        "capabilities": {},
                        "clientInfo": {"name": "test-client", "version": "1.0.0"}
                    })),
                ),
                TOKEN,
            )
            .await;

        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "superthread-mcp");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_initialize_twice_is_fine() {
        let server = server(MockApi::new());

        for _ in 0..2 {
            let resp = server.handle_request(request("initialize", None), TOKEN).await;
            assert!(resp.error.is_none());
        }
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server(MockApi::new());

        let resp = server.handle_request(request("tools/list", None), TOKEN).await;

        let result: ToolsListResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.tools.iter().any(|t| t.name == "get_board"));
        assert!(result.tools.iter().any(|t| t.name == "create_card"));
    }

    #[tokio::test]
    async fn test_unknown_tool_invokes_nothing() {
        let mut client = MockApi::new();
        client.expect_request().never();
        let server = server(client);

        let resp = server
            .handle_request(
                request("tools/call", Some(json!({"name": "drop_database", "arguments": {}}))),
                TOKEN,
            )
            .await;

        let err = resp.error.unwrap();
        assert_eq!(err.code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Unknown tool: drop_database");
    }

    #[tokio::test]
    async fn test_tool_call_success() {
        let mut client = MockApi::new();
        client
            .expect_request()
            .withf(|req, token| req.endpoint == "/users/me" && token == TOKEN)
            .times(1)
            .returning(|_, _| Ok(Some(json!({"id": "u1"}))));
        let server = server(client);

        let resp = server
            .handle_request(request("tools/call", Some(json!({"name": "get_me"}))), TOKEN)
            .await;

        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "{\n  \"id\": \"u1\"\n}");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_jsonrpc_error() {
        let mut client = MockApi::new();
        client
            .expect_request()
            .times(1)
            .returning(|_, _| Err(Error::from_status(404, "Not Found", "{\"message\":\"Card not found\"}")));
        let server = server(client);

        let resp = server
            .handle_request(
                request(
                    "tools/call",
                    Some(json!({"name": "get_card", "arguments": {"team_id": "t1", "card_id": "nope"}})),
                ),
                TOKEN,
            )
            .await;

        let err = resp.error.unwrap();
        assert_eq!(err.code, JsonRpcError::TOOL_FAILED);
        assert_eq!(
            err.message,
            "Tool execution failed: API request failed: 404 Not Found - {\"message\":\"Card not found\"}"
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_tool_error() {
        let mut client = MockApi::new();
        client.expect_request().never();
        let server = server(client);

        let resp = server
            .handle_request(
                request(
                    "tools/call",
                    Some(json!({"name": "create_list", "arguments": {"team_id": "t1", "board_id": "b1", "title": "x", "behavior": "later"}})),
                ),
                TOKEN,
            )
            .await;

        let err = resp.error.unwrap();
        assert_eq!(err.code, JsonRpcError::TOOL_FAILED);
        assert!(err.message.contains("Invalid parameter 'behavior'"));
    }

    #[tokio::test]
    async fn test_tools_call_bad_params() {
        let server = server(MockApi::new());

        let missing = server.handle_request(request("tools/call", None), TOKEN).await;
        assert_eq!(missing.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

        let malformed = server
            .handle_request(request("tools/call", Some(json!("not an object"))), TOKEN)
            .await;
        assert_eq!(malformed.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_prompts() {
        let server = server(MockApi::new());

        let list = server.handle_request(request("prompts/list", None), TOKEN).await;
        assert_eq!(list.result.unwrap()["prompts"][0]["name"], "summarize_board");

        let get = server
            .handle_request(
                request(
                    "prompts/get",
                    Some(json!({"name": "triage_my_cards", "arguments": {"team_id": "t1"}})),
                ),
                TOKEN,
            )
            .await;
        let text = get.result.unwrap()["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(text.contains("team t1"));

        let missing = server
            .handle_request(
                request("prompts/get", Some(json!({"name": "triage_my_cards"}))),
                TOKEN,
            )
            .await;
        assert_eq!(missing.error.unwrap().code, JsonRpcError::INVALID_PARAMS);

        let unknown = server
            .handle_request(request("prompts/get", Some(json!({"name": "nope"}))), TOKEN)
            .await;
        assert_eq!(unknown.error.unwrap().code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_ping_and_unknown_method() {
        let server = server(MockApi::new());

        let ping = server.handle_request(request("ping", None), TOKEN).await;
        assert_eq!(ping.result, Some(json!({})));

        let unknown = server.handle_request(request("resources/list", None), TOKEN).await;
        let err = unknown.error.unwrap();
        assert_eq!(err.code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: resources/list");
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let server = server(MockApi::new());

        let msg = IncomingMessage::Notification(JsonRpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: "notifications/initialized".to_string(),
            params: None,
        });

        assert!(server.handle_message(msg, TOKEN).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_method_is_answered() {
        let server = server(MockApi::new());

        let msg = IncomingMessage::MissingMethod(RequestId::Number(3));
        let response = server.handle_message(msg, TOKEN).await.unwrap();

        assert_eq!(response.id, RequestId::Number(3));
        let err = response.error.unwrap();
        assert_eq!(err.code, JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found");
    }

    #[tokio::test]
    async fn test_run_over_stdio() {
        use tokio::io::BufReader;

        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n",
        );
        let (writer, mut reader) = tokio::io::duplex(4096);
        let mut transport = StdioTransport::new(
            Box::new(BufReader::new(std::io::Cursor::new(input.as_bytes().to_vec()))),
            Box::new(writer),
        );

        server(MockApi::new()).run(&mut transport, TOKEN).await.unwrap();
        drop(transport);

        let mut output = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut reader, &mut output)
            .await
            .unwrap();
        assert_eq!(output, "{\"jsonrpc\":\"2.0\",\"result\":{},\"id\":7}\n");
    }
}
