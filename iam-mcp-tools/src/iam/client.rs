//! IAM control-plane access.
//!
//! [`IamClient`] is the seam between the tools and AWS: the production
//! implementation wraps `aws_sdk_iam::Client`, tests script responses.
//! [`ClientProvider`] resolves a client for each invocation.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_iam::types::{AttachedPolicy, Policy, PolicyScopeType, PolicyVersion, Role};
use aws_types::region::Region;
use iam_mcp_core::{Page, ToolError};

pub(crate) const LIST_POLICIES: &str = "list iam policies";
pub(crate) const LIST_ROLES: &str = "list iam roles";
pub(crate) const LIST_ROLE_POLICIES: &str = "get role inline policies";
pub(crate) const LIST_ATTACHED_ROLE_POLICIES: &str = "get role attached policies";
pub(crate) const GET_ROLE_POLICY: &str = "get role inline policy";
pub(crate) const GET_POLICY_VERSION: &str = "get attached policy version";

/// Read-only IAM operations used by the tools.
///
/// Listing calls take the continuation marker of the previous page and return
/// one page. Errors are already mapped to [`ToolError::Remote`].
#[async_trait]
pub trait IamClient: Send + Sync {
    async fn list_policies(&self, marker: Option<String>) -> Result<Page<Policy>, ToolError>;

    async fn list_roles(&self, marker: Option<String>) -> Result<Page<Role>, ToolError>;

    /// Names of the inline policies embedded in `role`.
    async fn list_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<String>, ToolError>;

    async fn list_attached_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<AttachedPolicy>, ToolError>;

    /// The URL-encoded document of an inline role policy.
    async fn get_role_policy(&self, role: &str, policy: &str) -> Result<String, ToolError>;

    async fn get_policy_version(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> Result<PolicyVersion, ToolError>;
}

/// Resolves an [`IamClient`] for one invocation.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn client(&self) -> Result<Arc<dyn IamClient>, ToolError>;
}

/// Production implementation wrapping the AWS SDK client
pub struct SdkIamClient {
    client: aws_sdk_iam::Client,
}

impl SdkIamClient {
    pub fn new(client: aws_sdk_iam::Client) -> Self {
        Self { client }
    }
}

fn page_of<T>(items: Vec<T>, is_truncated: bool, marker: Option<&str>) -> Page<T> {
    Page {
        items,
        next_marker: marker.map(str::to_string),
        is_truncated,
    }
}

#[async_trait]
impl IamClient for SdkIamClient {
    async fn list_policies(&self, marker: Option<String>) -> Result<Page<Policy>, ToolError> {
        let output = self
            .client
            .list_policies()
            .scope(PolicyScopeType::All)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error(LIST_POLICIES, &e))?;

        Ok(page_of(
            output.policies().to_vec(),
            output.is_truncated(),
            output.marker(),
        ))
    }

    async fn list_roles(&self, marker: Option<String>) -> Result<Page<Role>, ToolError> {
        let output = self
            .client
            .list_roles()
            .path_prefix("/")
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error(LIST_ROLES, &e))?;

        Ok(page_of(
            output.roles().to_vec(),
            output.is_truncated(),
            output.marker(),
        ))
    }

    async fn list_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<String>, ToolError> {
        let output = self
            .client
            .list_role_policies()
            .role_name(role)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error(LIST_ROLE_POLICIES, &e))?;

        Ok(page_of(
            output.policy_names().to_vec(),
            output.is_truncated(),
            output.marker(),
        ))
    }

    async fn list_attached_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<AttachedPolicy>, ToolError> {
        let output = self
            .client
            .list_attached_role_policies()
            .role_name(role)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error(LIST_ATTACHED_ROLE_POLICIES, &e))?;

        Ok(page_of(
            output.attached_policies().to_vec(),
            output.is_truncated(),
            output.marker(),
        ))
    }

    async fn get_role_policy(&self, role: &str, policy: &str) -> Result<String, ToolError> {
        let output = self
            .client
            .get_role_policy()
            .role_name(role)
            .policy_name(policy)
            .send()
            .await
            .map_err(|e| remote_error(GET_ROLE_POLICY, &e))?;

        Ok(output.policy_document().to_string())
    }

    async fn get_policy_version(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> Result<PolicyVersion, ToolError> {
        let output = self
            .client
            .get_policy_version()
            .policy_arn(policy_arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| remote_error(GET_POLICY_VERSION, &e))?;

        output
            .policy_version()
            .cloned()
            .ok_or_else(|| {
                ToolError::remote(GET_POLICY_VERSION, "response carried no policy version")
            })
    }
}

/// Map an SDK error to [`ToolError::Remote`], keeping the innermost
/// meaningful message of the error chain.
fn remote_error(operation: &str, err: &(dyn StdError + 'static)) -> ToolError {
    let mut messages = Vec::new();
    collect_error_messages(err, &mut messages);

    let message = messages.pop().unwrap_or_else(|| "unknown error".to_string());
    ToolError::remote(operation, message)
}

/// Recursively collect error messages from an error chain
fn collect_error_messages(err: &dyn StdError, messages: &mut Vec<String>) {
    let msg = err.to_string();
    // Generic SDK wrapper messages carry nothing the host can act on
    if !msg.is_empty()
        && !msg.starts_with("service error")
        && !msg.starts_with("dispatch failure")
        && !msg.starts_with("connector error")
        && !msg.starts_with("unhandled error")
    {
        messages.push(msg);
    }

    if let Some(source) = err.source() {
        collect_error_messages(source, messages);
    }
}

/// Credential and region overrides for [`SdkClientProvider`].
///
/// Unset fields fall through to the SDK's default chain
/// (`AWS_PROFILE`, `AWS_REGION`, shared config files, instance metadata).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl AwsSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Builds a fresh [`SdkIamClient`] from the AWS shared config on every call.
///
/// Only a missing region is a [`ToolError::Config`] here.
#[derive(Debug, Clone, Default)]
pub struct SdkClientProvider {
    settings: AwsSettings,
}

impl SdkClientProvider {
    pub fn new(settings: AwsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AwsSettings {
        &self.settings
    }
}

#[async_trait]
impl ClientProvider for SdkClientProvider {
    async fn client(&self) -> Result<Arc<dyn IamClient>, ToolError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &self.settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &self.settings.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let config = loader.load().await;

        // Credentials resolve lazily; a missing or invalid chain fails the
        // first IAM call as a remote error.
        if config.region().is_none() {
            return Err(ToolError::Config("no region resolved".to_string()));
        }

        log::debug!(
            "resolved aws config (region {:?})",
            config.region().map(|r| r.as_ref())
        );

        Ok(Arc::new(SdkIamClient::new(aws_sdk_iam::Client::new(&config))))
    }
}
