//! MCP stdio server exposing read-only AWS IAM tools.
//!
//! The server publishes the five tools from `iam-mcp-tools` and answers
//! `tools/list` and `tools/call` over the MCP stdio transport.
//!
//! # Example
//!
//! ```rust,no_run
//! use iam_mcp_server::{serve_stdio, ServeArgs};
//!
//! # async fn example() -> Result<(), iam_mcp_server::ServerError> {
//! let args = ServeArgs {
//!     region: Some("us-east-1".to_string()),
//!     ..Default::default()
//! };
//! serve_stdio(&args).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handler;
mod logging;

pub use config::{Cli, Command, ServeArgs};
pub use error::{ServerError, ServerResult};
pub use handler::{IamMcpServer, SERVER_NAME};
pub use logging::{env_filter, init_logging, LogFormat};

use std::sync::Arc;

use iam_mcp_tools::iam::SdkClientProvider;
use rmcp::transport::IntoTransport;
use rmcp::{RoleServer, ServiceExt};

/// Build the AWS-backed server described by `args`.
pub fn build_server(args: &ServeArgs) -> ServerResult<IamMcpServer> {
    let provider = Arc::new(SdkClientProvider::new(args.aws_settings()));
    let registry = iam_mcp_tools::registry(provider)?;
    tracing::info!(tools = registry.len(), "tool registry ready");
    Ok(IamMcpServer::new(Arc::new(registry)))
}

/// Serve `server` on `transport` until the host disconnects.
pub async fn serve<T, E, A>(server: IamMcpServer, transport: T) -> ServerResult<()>
where
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
{
    let running = server
        .serve(transport)
        .await
        .map_err(|e| ServerError::Initialize(e.to_string()))?;

    let reason = running
        .waiting()
        .await
        .map_err(|e| ServerError::Transport(e.to_string()))?;

    tracing::info!(?reason, "MCP session ended");
    Ok(())
}

/// Serve the AWS-backed server over stdin/stdout.
pub async fn serve_stdio(args: &ServeArgs) -> ServerResult<()> {
    let server = build_server(args)?;
    serve(server, rmcp::transport::stdio()).await
}
