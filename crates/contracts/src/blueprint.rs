//! SimBlueprint - Config Loader output
//!
//! Describes a complete simulation run: bus channels, target placement,
//! sensor fleet, fusion tuning, supervisor policy, optional visualizer.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::report::SensorKind;

/// Complete simulation blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBlueprint {
    /// Bus channel addressing
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Target placement and trajectory settings
    pub targets: TargetsConfig,

    /// Sensor fleet definitions
    #[serde(default)]
    pub sensors: Vec<SensorSpec>,

    /// Fusion reducer tuning
    #[serde(default)]
    pub fusion: FusionConfig,

    /// Supervisor policy
    #[serde(default)]
    pub supervisor: SupervisorConfig,

    /// Optional external visualizer (ignored when headless)
    #[serde(default)]
    pub visualizer: Option<VisualizerConfig>,
}

/// Bus channel addressing (defaults: 224.1.1.1:5004 / 224.1.1.2:5005)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default = "default_object_group")]
    pub object_group: Ipv4Addr,

    #[serde(default = "default_object_port")]
    pub object_port: u16,

    #[serde(default = "default_sensor_group")]
    pub sensor_group: Ipv4Addr,

    #[serde(default = "default_sensor_port")]
    pub sensor_port: u16,
}

impl ChannelsConfig {
    pub fn object_channel(&self) -> Channel {
        Channel::new(self.object_group, self.object_port)
    }

    pub fn sensor_channel(&self) -> Channel {
        Channel::new(self.sensor_group, self.sensor_port)
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            object_group: default_object_group(),
            object_port: default_object_port(),
            sensor_group: default_sensor_group(),
            sensor_port: default_sensor_port(),
        }
    }
}

fn default_object_group() -> Ipv4Addr {
    Channel::default_object().group
}

fn default_object_port() -> u16 {
    Channel::default_object().port
}

fn default_sensor_group() -> Ipv4Addr {
    Channel::default_sensor().group
}

fn default_sensor_port() -> u16 {
    Channel::default_sensor().port
}

/// Target placement: evenly spaced on a circle, destination rotated by
/// `delta_deg` further around it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Number of moving targets
    pub count: usize,

    /// Placement circle radius
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Angular separation between start and destination (degrees)
    #[serde(default = "default_delta_deg")]
    pub delta_deg: f64,

    /// Time to traverse start -> destination (seconds)
    #[serde(default = "default_duration_sec")]
    pub duration_sec: f64,

    /// Emit interval (seconds)
    #[serde(default = "default_emit_interval_sec")]
    pub interval_sec: f64,
}

fn default_radius() -> f64 {
    10.0
}

fn default_delta_deg() -> f64 {
    135.0
}

fn default_duration_sec() -> f64 {
    10.0
}

fn default_emit_interval_sec() -> f64 {
    0.1
}

/// One sensor agent definition.
///
/// Only the fields relevant to `kind` are consulted; the rest keep their
/// defaults and are ignored by the spawned agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Unique name; defaults to `<kind><ordinal>` when omitted
    #[serde(default)]
    pub name: Option<String>,

    /// Producer variant
    pub kind: SensorKind,

    /// Gaussian noise std-dev (noisy)
    #[serde(default = "default_noise_std")]
    pub noise_std: f64,

    /// Mean publish interval I; actual draws are uniform in
    /// [0.8 I, 1.2 I] (adas)
    #[serde(default = "default_mean_interval_sec")]
    pub mean_interval_sec: f64,

    /// Fixed radar position (tacan)
    #[serde(default)]
    pub radar: Option<RadarPosition>,

    /// Full-rotation period in seconds (tacan)
    #[serde(default = "default_rotation_period_sec")]
    pub rotation_period_sec: f64,
}

/// Fixed base-station position for a rotating-scan sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPosition {
    pub x: f64,
    pub y: f64,
}

fn default_noise_std() -> f64 {
    0.5
}

fn default_mean_interval_sec() -> f64 {
    15.0
}

fn default_rotation_period_sec() -> f64 {
    60.0
}

/// Fusion reducer tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Recompute interval (seconds)
    #[serde(default = "default_fusion_tick_sec")]
    pub tick_sec: f64,

    /// Per-source staleness TTL in seconds; 0 disables eviction (the
    /// original behavior - known gap, kept by default)
    #[serde(default)]
    pub stale_after_sec: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            tick_sec: default_fusion_tick_sec(),
            stale_after_sec: 0.0,
        }
    }
}

fn default_fusion_tick_sec() -> f64 {
    0.1
}

/// Supervisor policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Liveness poll interval (seconds)
    #[serde(default = "default_poll_interval_sec")]
    pub poll_interval_sec: f64,

    /// Bus silence tolerated before declaring global inactivity (seconds)
    #[serde(default = "default_idle_timeout_sec")]
    pub idle_timeout_sec: f64,

    /// Pause between graceful stop and force kill (seconds)
    #[serde(default = "default_grace_period_sec")]
    pub grace_period_sec: f64,

    /// Max restarts per sensor agent; 0 = unlimited (original behavior)
    #[serde(default)]
    pub restart_limit: u32,

    /// Skip launching the visualizer
    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval_sec: default_poll_interval_sec(),
            idle_timeout_sec: default_idle_timeout_sec(),
            grace_period_sec: default_grace_period_sec(),
            restart_limit: 0,
            headless: default_headless(),
        }
    }
}

fn default_poll_interval_sec() -> f64 {
    1.0
}

fn default_idle_timeout_sec() -> f64 {
    300.0
}

fn default_grace_period_sec() -> f64 {
    1.0
}

fn default_headless() -> bool {
    true
}

/// External visualizer launch command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Program + arguments, executed as-is
    pub command: Vec<String>,
}

impl SimBlueprint {
    /// Fill in omitted sensor names as `<kind><ordinal>` (ordinal counted
    /// per kind, 1-based: noisy1, noisy2, adas1, ...).
    pub fn resolve_sensor_names(&mut self) {
        let mut per_kind: std::collections::HashMap<SensorKind, usize> =
            std::collections::HashMap::new();
        for spec in &mut self.sensors {
            let ordinal = per_kind.entry(spec.kind).or_insert(0);
            *ordinal += 1;
            if spec.name.is_none() {
                spec.name = Some(format!("{}{}", spec.kind.as_str(), ordinal));
            }
        }
    }

    /// Resolved sensor name; panics if `resolve_sensor_names` has not run.
    /// Intended for post-load code paths only.
    pub fn sensor_name(&self, index: usize) -> &str {
        self.sensors[index]
            .name
            .as_deref()
            .expect("sensor names resolved at load time")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.supervisor.poll_interval_sec)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.supervisor.idle_timeout_sec)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs_f64(self.supervisor.grace_period_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_simulation() {
        let channels = ChannelsConfig::default();
        assert_eq!(channels.object_channel().to_string(), "224.1.1.1:5004");
        assert_eq!(channels.sensor_channel().to_string(), "224.1.1.2:5005");

        let supervisor = SupervisorConfig::default();
        assert_eq!(supervisor.poll_interval_sec, 1.0);
        assert_eq!(supervisor.idle_timeout_sec, 300.0);
        assert_eq!(supervisor.restart_limit, 0);
        assert!(supervisor.headless);
    }

    #[test]
    fn resolve_sensor_names_counts_per_kind() {
        let mut blueprint = SimBlueprint {
            channels: ChannelsConfig::default(),
            targets: TargetsConfig {
                count: 1,
                radius: default_radius(),
                delta_deg: default_delta_deg(),
                duration_sec: default_duration_sec(),
                interval_sec: default_emit_interval_sec(),
            },
            sensors: vec![
                sensor(SensorKind::Noisy, None),
                sensor(SensorKind::Adas, None),
                sensor(SensorKind::Noisy, Some("custom")),
                sensor(SensorKind::Noisy, None),
            ],
            fusion: FusionConfig::default(),
            supervisor: SupervisorConfig::default(),
            visualizer: None,
        };

        blueprint.resolve_sensor_names();

        assert_eq!(blueprint.sensor_name(0), "noisy1");
        assert_eq!(blueprint.sensor_name(1), "adas1");
        assert_eq!(blueprint.sensor_name(2), "custom");
        assert_eq!(blueprint.sensor_name(3), "noisy3");
    }

    fn sensor(kind: SensorKind, name: Option<&str>) -> SensorSpec {
        SensorSpec {
            name: name.map(String::from),
            kind,
            noise_std: default_noise_std(),
            mean_interval_sec: default_mean_interval_sec(),
            radar: None,
            rotation_period_sec: default_rotation_period_sec(),
        }
    }
}
