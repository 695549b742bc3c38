//! Process-wide log setup.
//!
//! Stdout carries the MCP stream, so every log line goes to stderr.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable compact lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Build the level filter.
///
/// An explicit `level` wins over `RUST_LOG`; with neither set the filter is
/// `info`. An unparseable `level` falls back to `info`.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|err| {
            eprintln!("invalid log level {:?} ({}), using info", level, err);
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Initialize the tracing subscriber once for the process.
///
/// Records emitted through the `log` facade by the library crates are
/// forwarded into the same subscriber.
pub fn init_logging(level: Option<&str>, format: LogFormat) {
    TRACING_INIT.get_or_init(|| {
        let filter = env_filter(level);

        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
            LogFormat::Text => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
