//! MCP request handling.
//!
//! `JustMcpHandler` answers `tools/list` from the session registry and routes
//! `tools/call` through the invocation mapper. Tool failures come back as
//! results with `isError` set, never as protocol errors.

use std::sync::Arc;

use just_mcp_recipes::{Session, ToolDescriptor, ToolResponse};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use tracing::debug;

/// Server name reported during initialization.
pub const SERVER_NAME: &str = "just-mcp";

const INSTRUCTIONS: &str = "Each tool runs one recipe from the justfile. \
Arguments are passed to the recipe positionally in parameter order. \
Failures are reported in the text of the result: stderr follows a [stderr] \
marker and a non-zero status ends with [exit code: N].";

/// Handler for one session.
#[derive(Clone)]
pub struct JustMcpHandler {
    session: Arc<Session>,
    tools: Arc<Vec<Tool>>,
}

impl JustMcpHandler {
    /// Create a handler serving the session's tools.
    pub fn new(session: Session) -> Self {
        let tools = session.tools().map(to_mcp_tool).collect();
        Self {
            session: Arc::new(session),
            tools: Arc::new(tools),
        }
    }

    /// Tools advertised to clients.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Run a tool and wrap the response.
    pub async fn call(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        let response = self.session.call(name, arguments).await;
        to_call_result(response)
    }
}

/// Convert a descriptor into the protocol's tool type.
pub fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name.clone(),
        descriptor.description.clone(),
        Arc::new(descriptor.schema_object()),
    )
}

/// Convert a response into a tool result with a single text block.
pub fn to_call_result(response: ToolResponse) -> CallToolResult {
    let content = vec![Content::text(response.text)];
    if response.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl ServerHandler for JustMcpHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some(format!("Just MCP server for {}", self.session.justfile().display())),
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
        debug!("listing {} tools", self.tools.len());
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.call(&request.name, request.arguments.as_ref()).await)
    }
}
