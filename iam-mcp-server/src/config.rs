//! Command-line configuration.

use clap::{Args, Parser, Subcommand};
use iam_mcp_tools::iam::AwsSettings;

use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "iam-mcp-server", version)]
#[command(about = "MCP server exposing read-only AWS IAM tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdin/stdout
    Stdio(ServeArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// AWS shared config profile (defaults to the SDK credential chain)
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS region override
    #[arg(long)]
    pub region: Option<String>,

    /// Log filter, e.g. `debug` or `iam_mcp_core=debug,info` (overrides RUST_LOG)
    #[arg(long, env = "IAM_MCP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log line format, written to stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "IAM_MCP_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl ServeArgs {
    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            profile: self.profile.clone(),
            region: self.region.clone(),
        }
    }
}
