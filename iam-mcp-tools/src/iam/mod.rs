//! Read-only AWS IAM tools.
//!
//! Every tool resolves a fresh IAM client per invocation through a
//! [`ClientProvider`], enumerates paginated listings to exhaustion, and
//! returns either a compact JSON array of records or a raw policy document.
//!
//! | Tool | Arguments | Returns |
//! |------|-----------|---------|
//! | `list_policies` | | `[{"Name"}]` |
//! | `list_roles` | | `[{"Name"}]` |
//! | `get_role_policies` | `role` | `[{"Name", "Type", "Arn"}]` |
//! | `get_inline_policy` | `role`, `policy` | policy document |
//! | `get_attached_policy` | `policy_arn` | policy document (version `v1`) |
//!
//! # Example
//!
//! ```no_run
//! use iam_mcp_core::InvocationRequest;
//! use iam_mcp_tools::iam::{self, AwsSettings, SdkClientProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(SdkClientProvider::new(AwsSettings::new().region("us-east-1")));
//! let registry = iam::registry(provider).unwrap();
//! assert_eq!(registry.len(), 5);
//!
//! # tokio_test::block_on(async {
//! let result = registry.dispatch(&InvocationRequest::from_value("list_roles", None)).await;
//! println!("{}", result.text());
//! # });
//! ```

mod client;
mod encode;
mod get_attached_policy;
mod get_inline_policy;
mod get_role_policies;
mod list_policies;
mod list_roles;
mod records;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::{AwsSettings, ClientProvider, IamClient, SdkClientProvider, SdkIamClient};
pub use encode::{encode_document, encode_records};
pub use get_attached_policy::{
    GetAttachedPolicyInput, GetAttachedPolicyTool, DEFAULT_POLICY_VERSION,
};
pub use get_inline_policy::{GetInlinePolicyInput, GetInlinePolicyTool};
pub use get_role_policies::{GetRolePoliciesInput, GetRolePoliciesTool};
pub use list_policies::{ListPoliciesInput, ListPoliciesTool};
pub use list_roles::{ListRolesInput, ListRolesTool};
pub use records::{PolicyKind, PolicyRecord, RoleRecord};

use iam_mcp_core::{box_tool, DynTool, RegistryError, ToolRegistry};
use std::sync::Arc;

/// Returns all five IAM tools, bound to `provider`, in listing order.
pub fn all_tools(provider: Arc<dyn ClientProvider>) -> Vec<Box<dyn DynTool>> {
    vec![
        box_tool(ListPoliciesTool::new(provider.clone())),
        box_tool(ListRolesTool::new(provider.clone())),
        box_tool(GetRolePoliciesTool::new(provider.clone())),
        box_tool(GetInlinePolicyTool::new(provider.clone())),
        box_tool(GetAttachedPolicyTool::new(provider)),
    ]
}

/// A registry holding [`all_tools`].
pub fn registry(provider: Arc<dyn ClientProvider>) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new(all_tools(provider))
}
