//! Error types for the IAM MCP server.

use iam_mcp_core::RegistryError;

/// Errors that stop the server from starting or keep it from running.
///
/// Tool failures never surface here; they are returned to the host as
/// tool-level errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The tool set could not be assembled.
    #[error("failed to build tool registry: {0}")]
    Registry(#[from] RegistryError),

    /// The MCP handshake with the host failed.
    #[error("MCP initialization failed: {0}")]
    Initialize(String),

    /// The serving task ended abnormally.
    #[error("MCP transport error: {0}")]
    Transport(String),
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
