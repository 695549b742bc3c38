use crate::iam::client::{ClientProvider, GET_POLICY_VERSION};
use crate::iam::encode::encode_document;
use crate::prelude::*;
use std::sync::Arc;

/// Policy version requested for attached policies.
pub const DEFAULT_POLICY_VERSION: &str = "v1";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAttachedPolicyInput {
    /// The ARN of the managed policy
    pub policy_arn: String,
}

/// Tool for fetching the document of a managed policy.
///
/// Always requests version `v1`. The document of whatever version IAM returns
/// is passed through unmodified.
pub struct GetAttachedPolicyTool {
    provider: Arc<dyn ClientProvider>,
}

impl GetAttachedPolicyTool {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }
}

impl Tool for GetAttachedPolicyTool {
    type Input = GetAttachedPolicyInput;

    fn name(&self) -> &str {
        "get_attached_policy"
    }

    fn description(&self) -> &str {
        "Get role attached policy"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let client = self.provider.client().await?;
        let version = client
            .get_policy_version(&input.policy_arn, DEFAULT_POLICY_VERSION)
            .await?;

        if version.version_id() != Some(DEFAULT_POLICY_VERSION) {
            log::debug!(
                "{} returned version {:?}",
                input.policy_arn,
                version.version_id()
            );
        }

        let document = version
            .document()
            .ok_or_else(|| ToolError::remote(GET_POLICY_VERSION, "policy version has no document"))?;

        Ok(encode_document(document))
    }
}
