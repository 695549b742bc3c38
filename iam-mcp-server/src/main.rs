use anyhow::Result;
use clap::Parser;
use iam_mcp_server::{init_logging, serve_stdio, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stdio(args) => {
            init_logging(args.log_level.as_deref(), args.log_format);
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "starting {} on stdio",
                iam_mcp_server::SERVER_NAME
            );
            serve_stdio(&args).await?;
        }
    }

    Ok(())
}
