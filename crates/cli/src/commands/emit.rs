//! `emit` command implementation.

use std::time::Duration;

use agents::{run_emitter, EmitterConfig};
use anyhow::{Context, Result};

use crate::cli::EmitArgs;
use crate::stop::stop_signal;

/// Execute the `emit` command
pub async fn run_emit(args: &EmitArgs) -> Result<()> {
    let config = EmitterConfig {
        name: args.name.clone(),
        start: (args.start_x, args.start_y),
        end: (args.end_x, args.end_y),
        duration: Duration::from_secs_f64(args.duration),
        interval: Duration::from_secs_f64(args.interval),
    };

    run_emitter(config, args.object.channel(), stop_signal())
        .await
        .context("emitter failed")
}
