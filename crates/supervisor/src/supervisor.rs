//! Supervisor core - spawn, poll, restart, idle-detect, shut down.

use std::time::{Duration, Instant};

use contracts::{ChannelsConfig, SensorKind, SensorSpec, SimBlueprint, SimError};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::handle::{AgentHandle, ManagedRole, RespawnSpec};
use crate::monitor::{run_activity_monitor, ActivityClock};
use crate::placement::{circle_placement, PathPlan};

/// Statistics from one supervised run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Processes spawned at startup (excluding restarts)
    pub spawned: usize,

    /// Sensor agent restarts performed
    pub restarts: u64,

    /// Emitters that reached their terminal state
    pub emitter_exits: usize,

    /// True when the run ended through idle detection rather than
    /// interruption
    pub idle_shutdown: bool,

    /// Total supervised duration
    pub duration: Duration,
}

/// Exclusive owner of every managed process.
pub struct Supervisor {
    blueprint: SimBlueprint,
    agents: Vec<AgentHandle>,
    clock: ActivityClock,
    stats: RunStats,
}

impl Supervisor {
    pub fn new(blueprint: SimBlueprint) -> Self {
        Self {
            blueprint,
            agents: Vec::new(),
            clock: ActivityClock::new(),
            stats: RunStats::default(),
        }
    }

    /// Number of currently tracked agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Spawn emitters, sensor agents, the fusion reducer and (when not
    /// headless) the visualizer, per the blueprint.
    #[instrument(name = "supervisor_spawn_all", skip(self))]
    pub fn spawn_all(&mut self) -> Result<(), SimError> {
        let targets = &self.blueprint.targets;
        let plans = circle_placement(targets.count, targets.radius, targets.delta_deg);

        for plan in &plans {
            let spec = RespawnSpec::current_exe(self.emit_args(plan))?;
            let handle = AgentHandle::spawn(plan.name.clone(), ManagedRole::Emitter, spec)?;
            info!(
                emitter = %plan.name,
                start = ?plan.start,
                end = ?plan.end,
                "emitter launched"
            );
            self.agents.push(handle);
        }

        for index in 0..self.blueprint.sensors.len() {
            let name = self.blueprint.sensor_name(index).to_string();
            let spec =
                RespawnSpec::current_exe(self.sensor_args(&name, &self.blueprint.sensors[index]))?;
            let handle = AgentHandle::spawn(name.clone(), ManagedRole::Sensor, spec)?;
            info!(
                sensor = %name,
                kind = self.blueprint.sensors[index].kind.as_str(),
                "sensor agent launched"
            );
            self.agents.push(handle);
        }

        let fuse_spec = RespawnSpec::current_exe(self.fuse_args())?;
        self.agents
            .push(AgentHandle::spawn("fusion", ManagedRole::Fusion, fuse_spec)?);
        info!("fusion reducer launched");

        if !self.blueprint.supervisor.headless {
            if let Some(viz) = &self.blueprint.visualizer {
                let (program, args) = viz
                    .command
                    .split_first()
                    .ok_or_else(|| SimError::spawn("visualizer", "empty command"))?;
                let spec = RespawnSpec::external(program, args.to_vec());
                self.agents
                    .push(AgentHandle::spawn("visualizer", ManagedRole::Visualizer, spec)?);
                info!(command = %program, "visualizer launched");
            } else {
                warn!("headless disabled but no visualizer command configured");
            }
        }

        self.stats.spawned = self.agents.len();
        info!(agents = self.agents.len(), "all processes launched");
        Ok(())
    }

    /// Run the supervise loop to completion: poll liveness on a fixed
    /// interval, restart crashed sensors, and shut everything down on
    /// global inactivity or interruption.
    pub async fn supervise(mut self) -> Result<RunStats, SimError> {
        let started = Instant::now();
        let idle_timeout = self.blueprint.idle_timeout();

        // Passive listener; only the shared clock crosses the task boundary
        let (monitor_stop, monitor_stop_rx) = watch::channel(false);
        let sensor_channel = self.blueprint.channels.sensor_channel();
        let monitor = tokio::spawn(run_activity_monitor(
            sensor_channel,
            self.clock.clone(),
            monitor_stop_rx,
        ));

        let mut poll = tokio::time::interval(self.blueprint.poll_interval());
        let interrupted = shutdown_signal();
        tokio::pin!(interrupted);

        info!(
            poll_sec = self.blueprint.supervisor.poll_interval_sec,
            idle_timeout_sec = self.blueprint.supervisor.idle_timeout_sec,
            "supervise loop started"
        );

        loop {
            tokio::select! {
                _ = &mut interrupted => {
                    warn!("interrupted, stopping all managed processes");
                    self.shutdown(true).await;
                    break;
                }
                _ = poll.tick() => {
                    self.poll_agents();

                    let idle = self.clock.idle_for();
                    if idle > idle_timeout {
                        info!(
                            idle_sec = idle.as_secs_f64(),
                            "no bus traffic within idle timeout, shutting down"
                        );
                        self.stats.idle_shutdown = true;
                        self.shutdown(false).await;
                        break;
                    }
                }
            }
        }

        let _ = monitor_stop.send(true);
        let _ = tokio::time::timeout(Duration::from_secs(1), monitor).await;

        self.stats.duration = started.elapsed();
        Ok(self.stats)
    }

    /// One liveness pass over every managed process.
    fn poll_agents(&mut self) {
        let restart_limit = self.blueprint.supervisor.restart_limit;

        for agent in &mut self.agents {
            let Some(status) = agent.poll_exit() else {
                continue;
            };
            let code = status.code();

            match agent.role() {
                ManagedRole::Emitter => {
                    info!(agent = %agent.name(), code = ?code, "emitter exited");
                    self.stats.emitter_exits += 1;
                    agent.mark_terminated();
                }
                ManagedRole::Fusion => {
                    info!(agent = %agent.name(), code = ?code, "fusion reducer exited");
                    agent.mark_terminated();
                }
                ManagedRole::Visualizer => {
                    info!(agent = %agent.name(), code = ?code, "visualizer exited");
                    agent.mark_terminated();
                }
                ManagedRole::Sensor => {
                    if restart_limit > 0 && agent.restarts() >= restart_limit {
                        warn!(
                            agent = %agent.name(),
                            restarts = agent.restarts(),
                            "restart limit reached, giving up on sensor"
                        );
                        agent.mark_terminated();
                        continue;
                    }

                    warn!(
                        agent = %agent.name(),
                        code = ?code,
                        "sensor exited, restarting with original parameters"
                    );
                    match agent.respawn() {
                        Ok(()) => {
                            self.stats.restarts += 1;
                            observability::record_agent_restart(agent.name());
                        }
                        Err(e) => {
                            // Nothing to retry with if the binary itself is gone
                            error!(agent = %agent.name(), error = %e, "respawn failed");
                            agent.mark_terminated();
                        }
                    }
                }
            }
        }
    }

    /// Two-phase shutdown: close every target's stdin (cooperative stop),
    /// wait the grace period, then force-kill stragglers.
    ///
    /// The visualizer is spared on the idle path
    /// (`include_visualizer = false`) and included on interruption.
    #[instrument(name = "supervisor_shutdown", skip(self))]
    pub async fn shutdown(&mut self, include_visualizer: bool) {
        let grace = self.blueprint.grace_period();
        info!(
            grace_sec = grace.as_secs_f64(),
            include_visualizer, "beginning two-phase shutdown"
        );

        for agent in &mut self.agents {
            if agent.role() == ManagedRole::Visualizer && !include_visualizer {
                continue;
            }
            agent.close_stdin();
        }

        tokio::time::sleep(grace).await;

        for agent in &mut self.agents {
            if agent.role() == ManagedRole::Visualizer && !include_visualizer {
                continue;
            }
            agent.force_kill().await;
        }

        info!("shutdown complete");
    }

    fn emit_args(&self, plan: &PathPlan) -> Vec<String> {
        let targets = &self.blueprint.targets;
        let mut args = vec![
            "emit".to_string(),
            "--name".into(),
            plan.name.clone(),
            "--start-x".into(),
            plan.start.0.to_string(),
            "--start-y".into(),
            plan.start.1.to_string(),
            "--end-x".into(),
            plan.end.0.to_string(),
            "--end-y".into(),
            plan.end.1.to_string(),
            "--duration".into(),
            targets.duration_sec.to_string(),
            "--interval".into(),
            targets.interval_sec.to_string(),
        ];
        args.extend(object_channel_args(&self.blueprint.channels));
        args
    }

    fn sensor_args(&self, name: &str, spec: &SensorSpec) -> Vec<String> {
        let mut args = vec![
            "sensor".to_string(),
            "--name".into(),
            name.to_string(),
            "--kind".into(),
            spec.kind.as_str().to_string(),
        ];
        match spec.kind {
            SensorKind::Noisy => {
                args.extend(["--noise-std".into(), spec.noise_std.to_string()]);
            }
            SensorKind::Adas => {
                args.extend(["--mean-interval".into(), spec.mean_interval_sec.to_string()]);
            }
            SensorKind::Tacan => {
                // Validated at load time
                if let Some(radar) = spec.radar {
                    args.extend([
                        "--radar-x".into(),
                        radar.x.to_string(),
                        "--radar-y".into(),
                        radar.y.to_string(),
                    ]);
                }
                args.extend([
                    "--rotation-period".into(),
                    spec.rotation_period_sec.to_string(),
                ]);
            }
        }
        args.extend(object_channel_args(&self.blueprint.channels));
        args.extend(sensor_channel_args(&self.blueprint.channels));
        args
    }

    fn fuse_args(&self) -> Vec<String> {
        let mut args = vec![
            "fuse".to_string(),
            "--tick".into(),
            self.blueprint.fusion.tick_sec.to_string(),
            "--stale-after".into(),
            self.blueprint.fusion.stale_after_sec.to_string(),
        ];
        args.extend(sensor_channel_args(&self.blueprint.channels));
        args
    }
}

fn object_channel_args(channels: &ChannelsConfig) -> Vec<String> {
    vec![
        "--object-group".into(),
        channels.object_group.to_string(),
        "--object-port".into(),
        channels.object_port.to_string(),
    ]
}

fn sensor_channel_args(channels: &ChannelsConfig) -> Vec<String> {
    vec![
        "--sensor-group".into(),
        channels.sensor_group.to_string(),
        "--sensor-port".into(),
        channels.sensor_port.to_string(),
    ]
}

/// Resolves on Ctrl+C or (on unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{RadarPosition, TargetsConfig};

    fn blueprint_with_sensor(kind: SensorKind) -> SimBlueprint {
        let mut blueprint = SimBlueprint {
            channels: ChannelsConfig::default(),
            targets: TargetsConfig {
                count: 2,
                radius: 10.0,
                delta_deg: 135.0,
                duration_sec: 10.0,
                interval_sec: 0.1,
            },
            sensors: vec![SensorSpec {
                name: None,
                kind,
                noise_std: 0.5,
                mean_interval_sec: 15.0,
                radar: Some(RadarPosition { x: 1.0, y: -2.0 }),
                rotation_period_sec: 60.0,
            }],
            fusion: Default::default(),
            supervisor: Default::default(),
            visualizer: None,
        };
        blueprint.resolve_sensor_names();
        blueprint
    }

    #[test]
    fn emit_args_carry_placement_and_channel() {
        let blueprint = blueprint_with_sensor(SensorKind::Noisy);
        let supervisor = Supervisor::new(blueprint);
        let plans = circle_placement(2, 10.0, 135.0);

        let args = supervisor.emit_args(&plans[0]);
        assert_eq!(args[0], "emit");
        assert!(args.contains(&"--name".to_string()));
        assert!(args.contains(&"target1".to_string()));
        assert!(args.contains(&"--object-group".to_string()));
        assert!(args.contains(&"224.1.1.1".to_string()));
    }

    #[test]
    fn sensor_args_include_only_kind_relevant_params() {
        let blueprint = blueprint_with_sensor(SensorKind::Tacan);
        let supervisor = Supervisor::new(blueprint);

        let args = supervisor.sensor_args("tacan1", &supervisor.blueprint.sensors[0]);
        assert!(args.contains(&"--radar-x".to_string()));
        assert!(args.contains(&"--rotation-period".to_string()));
        assert!(!args.contains(&"--noise-std".to_string()));
        assert!(!args.contains(&"--mean-interval".to_string()));
    }

    #[test]
    fn noisy_args_skip_radar_params() {
        let blueprint = blueprint_with_sensor(SensorKind::Noisy);
        let supervisor = Supervisor::new(blueprint);

        let args = supervisor.sensor_args("noisy1", &supervisor.blueprint.sensors[0]);
        assert!(args.contains(&"--noise-std".to_string()));
        assert!(!args.contains(&"--radar-x".to_string()));
    }

    #[test]
    fn fuse_args_carry_tick_and_sensor_channel() {
        let blueprint = blueprint_with_sensor(SensorKind::Adas);
        let supervisor = Supervisor::new(blueprint);

        let args = supervisor.fuse_args();
        assert_eq!(args[0], "fuse");
        assert!(args.contains(&"--tick".to_string()));
        assert!(args.contains(&"--sensor-port".to_string()));
        assert!(!args.contains(&"--object-port".to_string()));
    }
}
