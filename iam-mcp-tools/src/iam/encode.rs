use iam_mcp_core::{ToolError, ToolResult};
use serde::Serialize;

/// Encode a record collection as a compact JSON array.
///
/// An empty collection encodes as `[]`.
pub fn encode_records<T: Serialize>(records: &[T]) -> Result<ToolResult, ToolError> {
    let body = serde_json::to_string(records)?;
    Ok(ToolResult::text(body))
}

/// Return a policy document exactly as IAM sent it.
///
/// IAM returns documents URL-encoded; they are not decoded here.
pub fn encode_document(document: impl Into<String>) -> ToolResult {
    ToolResult::text(document)
}
