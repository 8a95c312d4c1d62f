//! # Trackfuse CLI
//!
//! Command-line entry point.
//!
//! One multi-call binary: `run` supervises a whole simulation, while
//! `emit`, `sensor` and `fuse` are the child processes the supervisor
//! spawns (and respawns) by re-invoking this executable.

mod cli;
mod commands;
mod stats;
mod stop;

use anyhow::Result;
use clap::Parser;
use observability::{LogFormat, ObservabilityConfig};
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_emit, run_fuse, run_info, run_sensor, run_simulation, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "trackfuse starting");

    let result = match &cli.command {
        Commands::Run(args) => run_simulation(args).await,
        Commands::Emit(args) => run_emit(args).await,
        Commands::Sensor(args) => run_sensor(args).await,
        Commands::Fuse(args) => run_fuse(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    };

    let log_format = match cli.log_format {
        cli::LogFormatArg::Json => LogFormat::Json,
        cli::LogFormatArg::Pretty => LogFormat::Pretty,
        cli::LogFormatArg::Compact => LogFormat::Compact,
    };

    observability::init_with_config(ObservabilityConfig {
        log_format,
        metrics_port: None,
        default_log_level,
    })
}
