use crate::iam::client::ClientProvider;
use crate::iam::encode::encode_document;
use crate::prelude::*;
use std::sync::Arc;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetInlinePolicyInput {
    /// The name of the role
    pub role: String,
    /// The name of the inline policy
    pub policy: String,
}

/// Tool for fetching the document of an inline role policy.
///
/// The document is returned exactly as IAM sends it (URL-encoded JSON).
pub struct GetInlinePolicyTool {
    provider: Arc<dyn ClientProvider>,
}

impl GetInlinePolicyTool {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self { provider }
    }
}

impl Tool for GetInlinePolicyTool {
    type Input = GetInlinePolicyInput;

    fn name(&self) -> &str {
        "get_inline_policy"
    }

    fn description(&self) -> &str {
        "Get role inline policy"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let client = self.provider.client().await?;
        let document = client.get_role_policy(&input.role, &input.policy).await?;
        Ok(encode_document(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::client::GET_ROLE_POLICY;
    use crate::iam::testing::{MockCall, MockClientProvider, MockIamClient};

    #[tokio::test]
    async fn test_document_returned_verbatim() {
        let document = "%7B%22Version%22%3A%222012-10-17%22%2C%22Statement%22%3A%5B%5D%7D";
        let client = Arc::new(MockIamClient::new().with_role_policy(Ok(document.to_string())));
        let tool = GetInlinePolicyTool::new(Arc::new(MockClientProvider::new(client.clone())));

        let result = tool
            .execute(GetInlinePolicyInput {
                role: "deploy".to_string(),
                policy: "s3-scratch".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.as_str(), Some(document));
        assert_eq!(
            client.calls(),
            vec![MockCall::GetRolePolicy {
                role: "deploy".to_string(),
                policy: "s3-scratch".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_remote_failure() {
        let client = Arc::new(MockIamClient::new().with_role_policy(Err(ToolError::remote(
            GET_ROLE_POLICY,
            "NoSuchEntity: The role policy with name missing cannot be found.",
        ))));
        let tool = GetInlinePolicyTool::new(Arc::new(MockClientProvider::new(client)));

        let err = tool
            .execute(GetInlinePolicyInput {
                role: "deploy".to_string(),
                policy: "missing".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("failed to get role inline policy: NoSuchEntity"));
    }
}
