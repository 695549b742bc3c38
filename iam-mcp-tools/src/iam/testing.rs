//! Scripted IAM client for tests.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! iam-mcp-tools = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_iam::primitives::DateTime;
use aws_sdk_iam::types::{AttachedPolicy, Policy, PolicyVersion, Role};
use iam_mcp_core::{Page, ToolError};

use super::client::{
    ClientProvider, IamClient, GET_POLICY_VERSION, GET_ROLE_POLICY, LIST_ATTACHED_ROLE_POLICIES,
    LIST_POLICIES, LIST_ROLES, LIST_ROLE_POLICIES,
};

/// One call received by [`MockIamClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListPolicies { marker: Option<String> },
    ListRoles { marker: Option<String> },
    ListRolePolicies { role: String, marker: Option<String> },
    ListAttachedRolePolicies { role: String, marker: Option<String> },
    GetRolePolicy { role: String, policy: String },
    GetPolicyVersion { policy_arn: String, version_id: String },
}

type Script<T> = Mutex<VecDeque<Result<T, ToolError>>>;

/// Replays queued responses per operation, in order, and records every call.
///
/// An operation whose queue is exhausted fails with a remote error.
#[derive(Default)]
pub struct MockIamClient {
    policies: Script<Page<Policy>>,
    roles: Script<Page<Role>>,
    inline: Script<Page<String>>,
    attached: Script<Page<AttachedPolicy>>,
    role_policy: Script<String>,
    policy_versions: Script<PolicyVersion>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockIamClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policies(self, response: Result<Page<Policy>, ToolError>) -> Self {
        self.policies.lock().unwrap().push_back(response);
        self
    }

    pub fn with_roles(self, response: Result<Page<Role>, ToolError>) -> Self {
        self.roles.lock().unwrap().push_back(response);
        self
    }

    pub fn with_inline_policies(self, response: Result<Page<String>, ToolError>) -> Self {
        self.inline.lock().unwrap().push_back(response);
        self
    }

    pub fn with_attached_policies(self, response: Result<Page<AttachedPolicy>, ToolError>) -> Self {
        self.attached.lock().unwrap().push_back(response);
        self
    }

    pub fn with_role_policy(self, response: Result<String, ToolError>) -> Self {
        self.role_policy.lock().unwrap().push_back(response);
        self
    }

    pub fn with_policy_version(self, response: Result<PolicyVersion, ToolError>) -> Self {
        self.policy_versions.lock().unwrap().push_back(response);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(script: &Script<T>, operation: &str) -> Result<T, ToolError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ToolError::remote(operation, "no mock response configured")))
}

#[async_trait]
impl IamClient for MockIamClient {
    async fn list_policies(&self, marker: Option<String>) -> Result<Page<Policy>, ToolError> {
        self.record(MockCall::ListPolicies { marker });
        next(&self.policies, LIST_POLICIES)
    }

    async fn list_roles(&self, marker: Option<String>) -> Result<Page<Role>, ToolError> {
        self.record(MockCall::ListRoles { marker });
        next(&self.roles, LIST_ROLES)
    }

    async fn list_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<String>, ToolError> {
        self.record(MockCall::ListRolePolicies {
            role: role.to_string(),
            marker,
        });
        next(&self.inline, LIST_ROLE_POLICIES)
    }

    async fn list_attached_role_policies(
        &self,
        role: &str,
        marker: Option<String>,
    ) -> Result<Page<AttachedPolicy>, ToolError> {
        self.record(MockCall::ListAttachedRolePolicies {
            role: role.to_string(),
            marker,
        });
        next(&self.attached, LIST_ATTACHED_ROLE_POLICIES)
    }

    async fn get_role_policy(&self, role: &str, policy: &str) -> Result<String, ToolError> {
        self.record(MockCall::GetRolePolicy {
            role: role.to_string(),
            policy: policy.to_string(),
        });
        next(&self.role_policy, GET_ROLE_POLICY)
    }

    async fn get_policy_version(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> Result<PolicyVersion, ToolError> {
        self.record(MockCall::GetPolicyVersion {
            policy_arn: policy_arn.to_string(),
            version_id: version_id.to_string(),
        });
        next(&self.policy_versions, GET_POLICY_VERSION)
    }
}

/// Hands out one shared [`MockIamClient`] and counts resolutions.
pub struct MockClientProvider {
    client: Arc<MockIamClient>,
    failure: Option<String>,
    resolutions: AtomicUsize,
}

impl MockClientProvider {
    pub fn new(client: Arc<MockIamClient>) -> Self {
        Self {
            client,
            failure: None,
            resolutions: AtomicUsize::new(0),
        }
    }

    /// A provider whose resolution always fails with a config error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            client: Arc::new(MockIamClient::new()),
            failure: Some(message.into()),
            resolutions: AtomicUsize::new(0),
        }
    }

    /// How many times a client was requested.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientProvider for MockClientProvider {
    async fn client(&self) -> Result<Arc<dyn IamClient>, ToolError> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(ToolError::Config(message.clone())),
            None => Ok(self.client.clone() as Arc<dyn IamClient>),
        }
    }
}

/// A managed policy with only its name set.
pub fn policy(name: &str) -> Policy {
    Policy::builder().policy_name(name).build()
}

/// A role with the fields IAM always returns.
pub fn role(name: &str) -> Role {
    Role::builder()
        .path("/")
        .role_name(name)
        .role_id(format!("AROA{}", name.to_uppercase()))
        .arn(format!("arn:aws:iam::123456789012:role/{}", name))
        .create_date(DateTime::from_secs(1_700_000_000))
        .build()
        .expect("role has all required fields")
}

pub fn attached(name: &str, arn: &str) -> AttachedPolicy {
    AttachedPolicy::builder()
        .policy_name(name)
        .policy_arn(arn)
        .build()
}

pub fn policy_version(version_id: &str, document: &str) -> PolicyVersion {
    PolicyVersion::builder()
        .version_id(version_id)
        .document(document)
        .is_default_version(true)
        .build()
}
