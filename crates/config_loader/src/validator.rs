//! Configuration validation.
//!
//! Rules:
//! - target count >= 1, positive radius/duration/interval
//! - sensor names unique after defaulting
//! - per-kind parameter sanity (noise_std >= 0, positive intervals/periods,
//!   tacan requires a radar position)
//! - positive supervisor/fusion timing values
//! - visualizer command non-empty when configured
//!
//! Sharing one channel between object and sensor traffic is legal (agents
//! filter by tag), so channel overlap is deliberately not rejected.

use std::collections::HashSet;

use contracts::{SensorKind, SimBlueprint, SimError};

/// Validate a resolved SimBlueprint.
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SimBlueprint) -> Result<(), SimError> {
    validate_channels(blueprint)?;
    validate_targets(blueprint)?;
    validate_sensors(blueprint)?;
    validate_fusion(blueprint)?;
    validate_supervisor(blueprint)?;
    validate_visualizer(blueprint)?;
    Ok(())
}

fn validate_channels(blueprint: &SimBlueprint) -> Result<(), SimError> {
    if blueprint.channels.object_port == 0 {
        return Err(SimError::config_validation(
            "channels.object_port",
            "port must be nonzero",
        ));
    }
    if blueprint.channels.sensor_port == 0 {
        return Err(SimError::config_validation(
            "channels.sensor_port",
            "port must be nonzero",
        ));
    }
    Ok(())
}

fn validate_targets(blueprint: &SimBlueprint) -> Result<(), SimError> {
    let targets = &blueprint.targets;

    if targets.count == 0 {
        return Err(SimError::config_validation(
            "targets.count",
            "at least one target is required",
        ));
    }
    if targets.radius <= 0.0 {
        return Err(SimError::config_validation(
            "targets.radius",
            format!("radius must be > 0, got {}", targets.radius),
        ));
    }
    if targets.duration_sec <= 0.0 {
        return Err(SimError::config_validation(
            "targets.duration_sec",
            format!("duration must be > 0, got {}", targets.duration_sec),
        ));
    }
    if targets.interval_sec <= 0.0 {
        return Err(SimError::config_validation(
            "targets.interval_sec",
            format!("interval must be > 0, got {}", targets.interval_sec),
        ));
    }
    Ok(())
}

fn validate_sensors(blueprint: &SimBlueprint) -> Result<(), SimError> {
    let mut seen = HashSet::new();

    for (idx, spec) in blueprint.sensors.iter().enumerate() {
        let name = spec.name.as_deref().ok_or_else(|| {
            SimError::config_validation(
                format!("sensors[{idx}].name"),
                "sensor name unresolved (loader bug)",
            )
        })?;

        if !seen.insert(name) {
            return Err(SimError::config_validation(
                format!("sensors[{idx}].name"),
                format!("duplicate sensor name '{name}'"),
            ));
        }

        match spec.kind {
            SensorKind::Noisy => {
                if spec.noise_std < 0.0 {
                    return Err(SimError::config_validation(
                        format!("sensors[{idx}].noise_std"),
                        format!("noise_std must be >= 0, got {}", spec.noise_std),
                    ));
                }
            }
            SensorKind::Adas => {
                if spec.mean_interval_sec <= 0.0 {
                    return Err(SimError::config_validation(
                        format!("sensors[{idx}].mean_interval_sec"),
                        format!("mean interval must be > 0, got {}", spec.mean_interval_sec),
                    ));
                }
            }
            SensorKind::Tacan => {
                if spec.radar.is_none() {
                    return Err(SimError::config_validation(
                        format!("sensors[{idx}].radar"),
                        "tacan sensors require a radar position",
                    ));
                }
                if spec.rotation_period_sec <= 0.0 {
                    return Err(SimError::config_validation(
                        format!("sensors[{idx}].rotation_period_sec"),
                        format!(
                            "rotation period must be > 0, got {}",
                            spec.rotation_period_sec
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_fusion(blueprint: &SimBlueprint) -> Result<(), SimError> {
    if blueprint.fusion.tick_sec <= 0.0 {
        return Err(SimError::config_validation(
            "fusion.tick_sec",
            format!("tick must be > 0, got {}", blueprint.fusion.tick_sec),
        ));
    }
    if blueprint.fusion.stale_after_sec < 0.0 {
        return Err(SimError::config_validation(
            "fusion.stale_after_sec",
            "staleness TTL cannot be negative",
        ));
    }
    Ok(())
}

fn validate_supervisor(blueprint: &SimBlueprint) -> Result<(), SimError> {
    let supervisor = &blueprint.supervisor;

    if supervisor.poll_interval_sec <= 0.0 {
        return Err(SimError::config_validation(
            "supervisor.poll_interval_sec",
            format!("poll interval must be > 0, got {}", supervisor.poll_interval_sec),
        ));
    }
    if supervisor.idle_timeout_sec <= 0.0 {
        return Err(SimError::config_validation(
            "supervisor.idle_timeout_sec",
            format!("idle timeout must be > 0, got {}", supervisor.idle_timeout_sec),
        ));
    }
    if supervisor.grace_period_sec < 0.0 {
        return Err(SimError::config_validation(
            "supervisor.grace_period_sec",
            "grace period cannot be negative",
        ));
    }
    Ok(())
}

fn validate_visualizer(blueprint: &SimBlueprint) -> Result<(), SimError> {
    if let Some(visualizer) = &blueprint.visualizer {
        if visualizer.command.is_empty() {
            return Err(SimError::config_validation(
                "visualizer.command",
                "visualizer command cannot be empty",
            ));
        }
    }
    Ok(())
}
