//! Tool execution.
//!
//! Validates arguments against the tool's schema, runs it against the shared
//! API client and wraps the JSON result as MCP text content.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use superthread_core::{ApiClient, Result};

use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::tools::{ToolDef, ToolRegistry};

/// Tool handler that executes tools against the Superthread API.
pub struct ToolHandler {
    client: Arc<dyn ApiClient>,
    registry: ToolRegistry,
}

impl ToolHandler {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            registry: ToolRegistry::new(),
        }
    }

    /// Tool definitions for `tools/list`.
    pub fn available_tools(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    pub fn find(&self, name: &str) -> Option<&ToolDef> {
        self.registry.find(name)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool. Nothing reaches the API when validation fails.
    pub async fn execute(
        &self,
        tool: &ToolDef,
        arguments: Option<Value>,
        token: &str,
    ) -> Result<ToolCallResult> {
        let started = Instant::now();
        let outcome = self.run(tool, arguments, token).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => tracing::info!(tool = tool.name, duration_ms, "tool_call_success"),
            Err(e) => tracing::warn!(tool = tool.name, duration_ms, error = %e, "tool_call_error"),
        }

        outcome
    }

    async fn run(
        &self,
        tool: &ToolDef,
        arguments: Option<Value>,
        token: &str,
    ) -> Result<ToolCallResult> {
        let args = tool.schema.validate(arguments.as_ref())?;
        let value = tool.run(self.client.as_ref(), &args, token).await?;
        Ok(ToolCallResult::json(&value)?)
    }
}
