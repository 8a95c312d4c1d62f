//! `sensor` command implementation.

use std::time::Duration;

use agents::{run_adas, run_noisy, run_tacan, AdasConfig, NoisyConfig, TacanConfig};
use anyhow::{Context, Result};
use contracts::RadarPosition;

use crate::cli::{KindArg, SensorArgs};
use crate::stop::stop_signal;

/// Execute the `sensor` command
pub async fn run_sensor(args: &SensorArgs) -> Result<()> {
    let object = args.object.channel();
    let sensor = args.sensor.channel();
    let stop = stop_signal();

    match args.kind {
        KindArg::Noisy => {
            let config = NoisyConfig {
                name: args.name.clone(),
                noise_std: args.noise_std,
            };
            run_noisy(config, object, sensor, stop).await
        }
        KindArg::Adas => {
            let config = AdasConfig {
                name: args.name.clone(),
                mean_interval: Duration::from_secs_f64(args.mean_interval),
            };
            run_adas(config, object, sensor, stop).await
        }
        KindArg::Tacan => {
            // clap enforces these for kind=tacan
            let radar = RadarPosition {
                x: args.radar_x.context("missing --radar-x")?,
                y: args.radar_y.context("missing --radar-y")?,
            };
            let config = TacanConfig {
                name: args.name.clone(),
                radar,
                rotation_period: Duration::from_secs_f64(args.rotation_period),
            };
            run_tacan(config, object, sensor, stop).await
        }
    }
    .context("sensor agent failed")
}
