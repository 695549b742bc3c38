//! # iam-mcp-core
//!
//! Building blocks for a read-only tool server: typed tools, a fixed tool
//! registry, invocation dispatch with argument validation, and a
//! marker-based pagination engine.
//!
//! ## Defining a tool
//!
//! ```rust
//! use iam_mcp_core::{Tool, ToolError, ToolResult};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, JsonSchema)]
//! struct LookupInput {
//!     /// The name of the role
//!     role: String,
//! }
//!
//! struct Lookup;
//!
//! impl Tool for Lookup {
//!     type Input = LookupInput;
//!
//!     fn name(&self) -> &str { "lookup" }
//!     fn description(&self) -> &str { "Look a role up" }
//!
//!     async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::text(input.role))
//!     }
//! }
//! ```
//!
//! ## Dispatching
//!
//! ```rust
//! # use iam_mcp_core::{Tool, ToolError, ToolResult};
//! # use schemars::JsonSchema;
//! # use serde::Deserialize;
//! # #[derive(Deserialize, JsonSchema)]
//! # struct LookupInput { role: String }
//! # struct Lookup;
//! # impl Tool for Lookup {
//! #     type Input = LookupInput;
//! #     fn name(&self) -> &str { "lookup" }
//! #     fn description(&self) -> &str { "Look a role up" }
//! #     async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
//! #         Ok(ToolResult::text(input.role))
//! #     }
//! # }
//! use iam_mcp_core::{box_tools, InvocationRequest, ToolRegistry};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let registry = ToolRegistry::new(box_tools![Lookup]).unwrap();
//!
//! let request = InvocationRequest::from_value("lookup", Some(json!({"role": "admin"})));
//! assert_eq!(registry.dispatch(&request).await.text(), "admin");
//!
//! let request = InvocationRequest::from_value("lookup", None);
//! assert_eq!(
//!     registry.dispatch(&request).await.text(),
//!     "failed to get argument: role"
//! );
//! # });
//! ```

pub mod dispatch;
pub mod pagination;
pub mod registry;
pub mod tool;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dispatch::{bind_arguments, InvocationRequest, InvocationResult};
pub use pagination::{fetch_all, Page};
pub use registry::{RegistryError, ToolDescriptor, ToolRegistry};
pub use tool::{
    arguments_from_schema, box_tool, ArgumentIssue, ArgumentSpec, ArgumentType, DynTool, Tool,
    ToolError, ToolResult,
};
