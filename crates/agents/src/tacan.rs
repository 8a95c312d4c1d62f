//! TACAN sensor - rotating-scan gate at a fixed radar position.
//!
//! Models a mechanically rotating directional sensor: an object is
//! published only while the scan angle sweeps over its bearing, and at most
//! once per full rotation.

use std::collections::HashSet;
use std::time::Duration;

use bus::{Publisher, Subscriber};
use contracts::{Channel, RadarPosition, Record, SensorKind, SensorReport, SimError};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, trace};

/// Angular gate width, degrees to either side of the scan angle.
const TOLERANCE_DEG: f64 = 1.0;

/// TACAN agent construction parameters
#[derive(Debug, Clone)]
pub struct TacanConfig {
    /// Sensor name carried in every published report
    pub name: String,

    /// Fixed base-station position
    pub radar: RadarPosition,

    /// Full 360-degree rotation period
    pub rotation_period: Duration,
}

/// Bearing from (x1, y1) to (x2, y2) in degrees, normalized to [0, 360).
pub fn bearing_deg(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y2 - y1).atan2(x2 - x1).to_degrees().rem_euclid(360.0)
}

/// Minimal angular difference between two angles in degrees, in [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Rotation-scan admission gate.
///
/// Pure relative to the caller-supplied elapsed time, so the
/// once-per-rotation property is testable without sockets or clocks.
pub struct RotationGate {
    radar: RadarPosition,
    period_sec: f64,
    published: HashSet<String>,
    last_elapsed: f64,
    last_since_start: f64,
}

impl RotationGate {
    pub fn new(radar: RadarPosition, rotation_period: Duration) -> Self {
        Self {
            radar,
            period_sec: rotation_period.as_secs_f64(),
            published: HashSet::new(),
            last_elapsed: 0.0,
            last_since_start: 0.0,
        }
    }

    /// Instantaneous scan angle at `since_start` seconds, in [0, 360).
    pub fn scan_angle_deg(&self, since_start: f64) -> f64 {
        since_start.rem_euclid(self.period_sec) / self.period_sec * 360.0
    }

    /// Admit or reject one report for `name` at position (x, y), observed
    /// `since_start` seconds after the dish started rotating.
    ///
    /// The published set clears at the moment elapsed-time-in-rotation
    /// wraps, bounding each name to at most one report per full sweep.
    pub fn observe(&mut self, since_start: f64, name: &str, x: f64, y: f64) -> bool {
        let elapsed = since_start.rem_euclid(self.period_sec);
        // A wrap shows up as elapsed running backwards; a silent gap of a
        // full period or more hides the wrap, so check for that too.
        if elapsed < self.last_elapsed || since_start - self.last_since_start >= self.period_sec {
            self.published.clear();
        }
        self.last_elapsed = elapsed;
        self.last_since_start = since_start;

        let scan = elapsed / self.period_sec * 360.0;
        let bearing = bearing_deg(self.radar.x, self.radar.y, x, y);

        if angular_difference(bearing, scan) <= TOLERANCE_DEG && !self.published.contains(name) {
            self.published.insert(name.to_string());
            true
        } else {
            false
        }
    }
}

/// Run the rotating-scan sensor until the object-channel closes or `stop`
/// fires.
pub async fn run_tacan(
    config: TacanConfig,
    object_channel: Channel,
    sensor_channel: Channel,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let mut subscriber = Subscriber::join(object_channel).await?;
    let publisher = Publisher::bind(sensor_channel).await?;

    let mut gate = RotationGate::new(config.radar, config.rotation_period);
    let started = Instant::now();

    info!(
        sensor = %config.name,
        radar_x = config.radar.x,
        radar_y = config.radar.y,
        rotation_period_sec = config.rotation_period.as_secs_f64(),
        listen = %object_channel,
        publish = %sensor_channel,
        "tacan sensor started"
    );

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            line = subscriber.recv() => {
                let Some(line) = line else { break };
                match Record::decode(&line) {
                    Record::Object(report) => {
                        let since_start = started.elapsed().as_secs_f64();
                        if gate.observe(since_start, &report.name, report.x, report.y) {
                            let out = SensorReport {
                                sensor_name: config.name.clone(),
                                x: report.x,
                                y: report.y,
                                t: report.t,
                                noise_std: 0.0,
                                kind: SensorKind::Tacan,
                            };
                            publisher.publish_sensor(&out).await;
                            observability::record_report_published(&config.name, SensorKind::Tacan.as_str());
                        } else {
                            trace!(
                                sensor = %config.name,
                                object = %report.name,
                                scan = gate.scan_angle_deg(since_start),
                                "outside scan gate"
                            );
                        }
                    }
                    Record::Sensor(_) => {}
                    Record::Unknown => {
                        observability::record_record_dropped(&config.name);
                    }
                }
            }
        }
    }

    debug!(sensor = %config.name, "tacan sensor stopped");
    Ok(())
}
