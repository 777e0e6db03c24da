//! MCP adapter over a [`Dispatcher`].
//!
//! `tools/list` is answered from the registry and `tools/call` is routed
//! through the dispatcher. Every call produces a [`CallToolResult`] with a
//! single text item; failures set `isError` instead of raising a protocol
//! error.

use std::sync::Arc;

use fleet_core::{Dispatcher, ResultEnvelope, ToolRegistry};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Value;

const INSTRUCTIONS: &str = "AWS account inspection and management tools. \
Credentials and region come from the server's environment.";

#[derive(Debug, Clone)]
pub struct FleetServer {
    dispatcher: Dispatcher,
}

impl FleetServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn from_registry(registry: ToolRegistry) -> Self {
        Self::new(Dispatcher::new(registry))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registered tools as MCP tool descriptors, in registration order.
    pub fn tools(&self) -> Vec<McpTool> {
        self.dispatcher
            .registry()
            .list()
            .map(|tool| {
                let schema = match tool.input_schema() {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema),
                )
            })
            .collect()
    }

    /// Invoke a tool and render the envelope as an MCP call result.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);
        to_call_result(self.dispatcher.invoke(name, arguments).await)
    }
}

fn to_call_result(envelope: ResultEnvelope) -> CallToolResult {
    let content = vec![Content::text(envelope.text())];
    if envelope.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl ServerHandler for FleetServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fleet".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}
