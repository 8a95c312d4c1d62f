//! `fuse` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use fusion::{run_reducer, ReducerConfig};

use crate::cli::FuseArgs;
use crate::stop::stop_signal;

/// Execute the `fuse` command
pub async fn run_fuse(args: &FuseArgs) -> Result<()> {
    let config = ReducerConfig {
        tick: Duration::from_secs_f64(args.tick),
        stale_after: (args.stale_after > 0.0)
            .then(|| Duration::from_secs_f64(args.stale_after)),
    };

    run_reducer(config, args.sensor.channel(), stop_signal())
        .await
        .context("fusion reducer failed")
}
