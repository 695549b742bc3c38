//! MCP request handling over the tool registry.

use std::sync::Arc;

use iam_mcp_core::{InvocationRequest, InvocationResult, ToolDescriptor, ToolRegistry};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value;

/// Name reported to the host during `initialize`.
pub const SERVER_NAME: &str = "aws-iam-mcp";

const INSTRUCTIONS: &str = "Read-only access to AWS IAM. \
    Use list_roles and list_policies to discover entities, get_role_policies to see the \
    inline and attached policies of a role, then get_inline_policy or get_attached_policy \
    to read a policy document. Documents are returned URL-encoded, exactly as IAM stores them.";

/// Serves the registry's tools to an MCP host.
#[derive(Clone)]
pub struct IamMcpServer {
    registry: Arc<ToolRegistry>,
}

impl IamMcpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The registry's tools as MCP tool definitions, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry.descriptors().into_iter().map(to_mcp_tool).collect()
    }

    /// Run one tool call.
    ///
    /// Failures come back as a tool-level error result, never as a protocol
    /// error, so the host sees the message.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let request = InvocationRequest::from_value(name, arguments.map(Value::Object));

        match self.registry.dispatch(&request).await {
            InvocationResult::Success(payload) => {
                CallToolResult::success(vec![Content::text(payload)])
            }
            InvocationResult::Failure { message, error } => {
                tracing::debug!(tool = name, error = ?error, "returning tool error");
                CallToolResult::error(vec![Content::text(message)])
            }
        }
    }
}

fn to_mcp_tool(descriptor: ToolDescriptor) -> Tool {
    let schema = match descriptor.input_schema {
        Value::Object(map) => map,
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".to_string(), Value::String("object".to_string()));
            map
        }
    };
    Tool::new(descriptor.name, descriptor.description, Arc::new(schema))
}

impl ServerHandler for IamMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
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
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tools/call");
        Ok(self.invoke(&request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iam_mcp_core::Page;
    use iam_mcp_tools::iam::testing::{role, MockClientProvider, MockIamClient};
    use serde_json::json;

    fn server(client: MockIamClient) -> IamMcpServer {
        let provider = Arc::new(MockClientProvider::new(Arc::new(client)));
        IamMcpServer::new(Arc::new(iam_mcp_tools::registry(provider).unwrap()))
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    fn args(value: Value) -> Option<JsonObject> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_server_info() {
        let info = server(MockIamClient::new()).get_info();
        assert_eq!(info.server_info.name, "aws-iam-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_tools_listed_in_order() {
        let tools = server(MockIamClient::new()).tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(
            names,
            vec![
                "list_policies",
                "list_roles",
                "get_role_policies",
                "get_inline_policy",
                "get_attached_policy",
            ]
        );
        assert_eq!(
            tools[2].description.as_deref(),
            Some("Gets policies attached to role")
        );
        assert_eq!(tools[4].input_schema["type"], "object");
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let server = server(MockIamClient::new().with_roles(Ok(Page::last(vec![role("ci")]))));

        let result = server.invoke("list_roles", None).await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), r#"[{"Name":"ci"}]"#);
    }

    #[tokio::test]
    async fn test_invoke_failure_is_tool_error() {
        let server = server(MockIamClient::new());

        let result = server
            .invoke("get_inline_policy", args(json!({"role": "ci"})))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "failed to get argument: policy");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let result = server(MockIamClient::new())
            .invoke("delete_role", None)
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "unknown tool: delete_role");
    }
}
