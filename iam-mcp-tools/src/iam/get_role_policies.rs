use crate::iam::client::{ClientProvider, LIST_ATTACHED_ROLE_POLICIES, LIST_ROLE_POLICIES};
use crate::iam::encode::encode_records;
use crate::iam::records::PolicyRecord;
use crate::prelude::*;
use iam_mcp_core::fetch_all;
use std::sync::Arc;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRolePoliciesInput {
    /// The name of the role
    pub role: String,
}

/// Tool for listing the inline and attached policies of a role.
///
/// Inline policies are listed first, then attached policies, each set in the
/// order IAM returns it.
pub struct GetRolePoliciesTool {
    provider: Arc<dyn ClientProvider>,
}

impl GetRolePoliciesTool {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }
}

impl Tool for GetRolePoliciesTool {
    type Input = GetRolePoliciesInput;

    fn name(&self) -> &str {
        "get_role_policies"
    }

    fn description(&self) -> &str {
        "Gets policies attached to role"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let client = self.provider.client().await?;
        let role = input.role.as_str();

        let mut records: Vec<PolicyRecord> = fetch_all(LIST_ROLE_POLICIES, |marker| {
            let client = client.clone();
            async move {
                let page = client.list_role_policies(role, marker).await?;
                Ok::<_, ToolError>(page.map_items(PolicyRecord::inline))
            }
        })
        .await?;

        let attached: Vec<PolicyRecord> = fetch_all(LIST_ATTACHED_ROLE_POLICIES, |marker| {
            let client = client.clone();
            async move {
                let page = client.list_attached_role_policies(role, marker).await?;
                Ok::<_, ToolError>(page.map_items(|p| PolicyRecord::from(&p)))
            }
        })
        .await?;

        records.extend(attached);
        encode_records(&records)
    }
}
