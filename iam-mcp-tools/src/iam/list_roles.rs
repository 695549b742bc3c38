use crate::iam::client::{ClientProvider, LIST_ROLES};
use crate::iam::encode::encode_records;
use crate::iam::records::RoleRecord;
use crate::prelude::*;
use iam_mcp_core::fetch_all;
use std::sync::Arc;

/// Input for listing roles (no arguments)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListRolesInput {}

/// Tool for listing every role in the account
pub struct ListRolesTool {
    provider: Arc<dyn ClientProvider>,
}

impl ListRolesTool {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }
}

impl Tool for ListRolesTool {
    type Input = ListRolesInput;

    fn name(&self) -> &str {
        "list_roles"
    }

    fn description(&self) -> &str {
        "Lists all IAM roles"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        let client = self.provider.client().await?;

        let records: Vec<RoleRecord> = fetch_all(LIST_ROLES, |marker| {
            let client = client.clone();
            async move {
                let page = client.list_roles(marker).await?;
                Ok::<_, ToolError>(page.map_items(|r| RoleRecord::from(&r)))
            }
        })
        .await?;

        encode_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::testing::{role, MockClientProvider, MockIamClient};
    use iam_mcp_core::Page;

    fn tool_with(client: MockIamClient) -> (ListRolesTool, Arc<MockIamClient>) {
        let client = Arc::new(client);
        let tool = ListRolesTool::new(Arc::new(MockClientProvider::new(client.clone())));
        (tool, client)
    }

    #[tokio::test]
    async fn test_list_roles_three_pages() {
        let (tool, client) = tool_with(
            MockIamClient::new()
                .with_roles(Ok(Page::truncated(vec![role("a"), role("b")], "m1")))
                .with_roles(Ok(Page::truncated(vec![role("c")], "m2")))
                .with_roles(Ok(Page::last(vec![role("d")]))),
        );

        let result = tool.execute(ListRolesInput {}).await.unwrap();
        assert_eq!(
            result.as_str(),
            Some(r#"[{"Name":"a"},{"Name":"b"},{"Name":"c"},{"Name":"d"}]"#)
        );
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_roles_error_on_second_page() {
        let (tool, _client) = tool_with(
            MockIamClient::new()
                .with_roles(Ok(Page::truncated(vec![role("a")], "m1")))
                .with_roles(Err(ToolError::remote(LIST_ROLES, "Throttling: Rate exceeded"))),
        );

        let err = tool.execute(ListRolesInput {}).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to list iam roles: Throttling: Rate exceeded"
        );
    }

    #[tokio::test]
    async fn test_list_roles_truncated_without_marker_stops() {
        let (tool, client) = tool_with(MockIamClient::new().with_roles(Ok(Page {
            items: vec![role("only")],
            next_marker: None,
            is_truncated: true,
        })));

        let result = tool.execute(ListRolesInput {}).await.unwrap();
        assert_eq!(result.as_str(), Some(r#"[{"Name":"only"}]"#));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_list_roles_empty_account() {
        let (tool, _client) = tool_with(MockIamClient::new().with_roles(Ok(Page::last(vec![]))));

        let result = tool.execute(ListRolesInput {}).await.unwrap();
        assert_eq!(result.as_str(), Some("[]"));
    }

    #[tokio::test]
    async fn test_list_roles_is_repeatable() {
        let (tool, _client) = tool_with(
            MockIamClient::new()
                .with_roles(Ok(Page::last(vec![role("x"), role("y")])))
                .with_roles(Ok(Page::last(vec![role("x"), role("y")]))),
        );

        let first = tool.execute(ListRolesInput {}).await.unwrap();
        let second = tool.execute(ListRolesInput {}).await.unwrap();
        assert_eq!(first, second);
    }
}
