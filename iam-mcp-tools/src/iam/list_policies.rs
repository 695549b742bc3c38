use crate::iam::client::{ClientProvider, LIST_POLICIES};
use crate::iam::encode::encode_records;
use crate::iam::records::PolicyRecord;
use crate::prelude::*;
use iam_mcp_core::fetch_all;
use std::sync::Arc;

/// Input for listing policies (no arguments)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListPoliciesInput {}

/// Tool for listing every managed policy visible to the account
pub struct ListPoliciesTool {
    provider: Arc<dyn ClientProvider>,
}

impl ListPoliciesTool {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }
}

impl Tool for ListPoliciesTool {
    type Input = ListPoliciesInput;

    fn name(&self) -> &str {
        "list_policies"
    }

    fn description(&self) -> &str {
        "Lists all IAM policies"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        let client = self.provider.client().await?;

        let records: Vec<PolicyRecord> = fetch_all(LIST_POLICIES, |marker| {
            let client = client.clone();
            async move {
                let page = client.list_policies(marker).await?;
                Ok::<_, ToolError>(page.map_items(|p| PolicyRecord::from(&p)))
            }
        })
        .await?;

        encode_records(&records)
    }
}
