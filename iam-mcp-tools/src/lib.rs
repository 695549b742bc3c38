//! Read-only AWS IAM tools built on `iam-mcp-core`.

pub mod iam;

pub use iam::{all_tools, registry};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use iam_mcp_core::{Tool, ToolError, ToolResult};
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
}
