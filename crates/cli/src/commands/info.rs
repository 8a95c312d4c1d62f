//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    channels: ChannelInfo,
    targets: TargetInfo,
    sensors: Vec<SensorInfo>,
    supervisor: SupervisorInfo,
}

#[derive(Serialize)]
struct ChannelInfo {
    object: String,
    sensor: String,
}

#[derive(Serialize)]
struct TargetInfo {
    count: usize,
    radius: f64,
    delta_deg: f64,
    duration_sec: f64,
}

#[derive(Serialize)]
struct SensorInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    noise_std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_interval_sec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radar: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotation_period_sec: Option<f64>,
}

#[derive(Serialize)]
struct SupervisorInfo {
    poll_interval_sec: f64,
    idle_timeout_sec: f64,
    grace_period_sec: f64,
    restart_limit: u32,
    headless: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Reading configuration");

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let config_info = build_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&config_info).context("Failed to serialize info")?;
        println!("{}", json);
        return Ok(());
    }

    println!("\n=== Configuration: {} ===\n", args.config.display());
    println!("Channels:");
    println!("  Object: {}", config_info.channels.object);
    println!("  Sensor: {}", config_info.channels.sensor);

    println!("\nTargets: {}", config_info.targets.count);
    println!(
        "  radius {}, delta {} deg, duration {}s",
        config_info.targets.radius, config_info.targets.delta_deg, config_info.targets.duration_sec
    );

    println!("\nSensors ({}):", config_info.sensors.len());
    for sensor in &config_info.sensors {
        if args.sensors {
            println!("  - {} ({})", sensor.name, sensor.kind);
            if let Some(noise_std) = sensor.noise_std {
                println!("      noise_std: {}", noise_std);
            }
            if let Some(interval) = sensor.mean_interval_sec {
                println!("      mean_interval: {}s", interval);
            }
            if let Some((x, y)) = sensor.radar {
                println!("      radar: ({}, {})", x, y);
            }
            if let Some(period) = sensor.rotation_period_sec {
                println!("      rotation_period: {}s", period);
            }
        } else {
            println!("  - {} ({})", sensor.name, sensor.kind);
        }
    }

    println!("\nSupervisor:");
    println!(
        "  poll {}s, idle timeout {}s, grace {}s, restart limit {}, headless {}",
        config_info.supervisor.poll_interval_sec,
        config_info.supervisor.idle_timeout_sec,
        config_info.supervisor.grace_period_sec,
        config_info.supervisor.restart_limit,
        config_info.supervisor.headless
    );
    println!();

    Ok(())
}

fn build_info(blueprint: &contracts::SimBlueprint) -> ConfigInfo {
    use contracts::SensorKind;

    let sensors = blueprint
        .sensors
        .iter()
        .enumerate()
        .map(|(index, spec)| SensorInfo {
            name: blueprint.sensor_name(index).to_string(),
            kind: spec.kind.as_str().to_string(),
            noise_std: (spec.kind == SensorKind::Noisy).then_some(spec.noise_std),
            mean_interval_sec: (spec.kind == SensorKind::Adas).then_some(spec.mean_interval_sec),
            radar: (spec.kind == SensorKind::Tacan)
                .then(|| spec.radar.map(|r| (r.x, r.y)))
                .flatten(),
            rotation_period_sec: (spec.kind == SensorKind::Tacan)
                .then_some(spec.rotation_period_sec),
        })
        .collect();

    ConfigInfo {
        channels: ChannelInfo {
            object: blueprint.channels.object_channel().to_string(),
            sensor: blueprint.channels.sensor_channel().to_string(),
        },
        targets: TargetInfo {
            count: blueprint.targets.count,
            radius: blueprint.targets.radius,
            delta_deg: blueprint.targets.delta_deg,
            duration_sec: blueprint.targets.duration_sec,
        },
        sensors,
        supervisor: SupervisorInfo {
            poll_interval_sec: blueprint.supervisor.poll_interval_sec,
            idle_timeout_sec: blueprint.supervisor.idle_timeout_sec,
            grace_period_sec: blueprint.supervisor.grace_period_sec,
            restart_limit: blueprint.supervisor.restart_limit,
            headless: blueprint.supervisor.headless,
        },
    }
}
