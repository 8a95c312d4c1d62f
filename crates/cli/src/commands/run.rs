//! `run` command implementation.

use anyhow::{Context, Result};
use supervisor::Supervisor;
use tracing::info;

use crate::cli::RunArgs;
use crate::stats::print_summary;

/// Execute the `run` command
pub async fn run_simulation(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(idle_timeout) = args.idle_timeout {
        info!(idle_timeout_sec = idle_timeout, "Overriding idle timeout from CLI");
        blueprint.supervisor.idle_timeout_sec = idle_timeout;
    }
    if args.headless {
        blueprint.supervisor.headless = true;
    }
    if args.visualize {
        blueprint.supervisor.headless = false;
    }

    info!(
        targets = blueprint.targets.count,
        sensors = blueprint.sensors.len(),
        object_channel = %blueprint.channels.object_channel(),
        sensor_channel = %blueprint.channels.sensor_channel(),
        idle_timeout_sec = blueprint.supervisor.idle_timeout_sec,
        headless = blueprint.supervisor.headless,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut supervisor = Supervisor::new(blueprint);
    supervisor
        .spawn_all()
        .context("Failed to launch simulation processes")?;

    // Interruption and idle detection are handled inside the supervise loop
    let stats = supervisor
        .supervise()
        .await
        .context("Supervise loop failed")?;

    info!(
        duration_secs = stats.duration.as_secs_f64(),
        restarts = stats.restarts,
        idle_shutdown = stats.idle_shutdown,
        "Simulation finished"
    );
    print_summary(&stats);

    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::SimBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Channels:");
    println!("  Object: {}", blueprint.channels.object_channel());
    println!("  Sensor: {}", blueprint.channels.sensor_channel());

    println!("\nTargets ({}):", blueprint.targets.count);
    println!(
        "  circle radius {}, delta {} deg, {}s per trajectory",
        blueprint.targets.radius, blueprint.targets.delta_deg, blueprint.targets.duration_sec
    );

    println!("\nSensors ({}):", blueprint.sensors.len());
    for (index, spec) in blueprint.sensors.iter().enumerate() {
        println!(
            "  - {} ({})",
            blueprint.sensor_name(index),
            spec.kind.as_str()
        );
    }

    println!("\nSupervisor:");
    println!(
        "  poll {}s, idle timeout {}s, grace {}s, headless: {}",
        blueprint.supervisor.poll_interval_sec,
        blueprint.supervisor.idle_timeout_sec,
        blueprint.supervisor.grace_period_sec,
        blueprint.supervisor.headless
    );

    println!();
}
