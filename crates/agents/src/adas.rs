//! ADAS sensor - debounced relay with a randomized per-target cadence.
//!
//! Per distinct object name the gate tracks a last-publish time and a
//! randomized next-interval drawn uniformly from [0.8 I, 1.2 I]. The first
//! report for a name publishes immediately; the position is republished
//! unmodified (not re-noised).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bus::{Publisher, Subscriber};
use contracts::{Channel, Record, SensorKind, SensorReport, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info};

/// ADAS agent construction parameters
#[derive(Debug, Clone)]
pub struct AdasConfig {
    /// Sensor name carried in every published report
    pub name: String,

    /// Mean publish interval I
    pub mean_interval: Duration,
}

struct DebounceEntry {
    last_publish: Option<Instant>,
    interval: Duration,
}

/// Per-target admission gate.
///
/// Pure relative to the caller-supplied clock and rng, so the cadence
/// property is testable without sockets.
pub struct DebounceGate {
    mean_interval: Duration,
    entries: HashMap<String, DebounceEntry>,
}

impl DebounceGate {
    pub fn new(mean_interval: Duration) -> Self {
        Self {
            mean_interval,
            entries: HashMap::new(),
        }
    }

    /// Admit or reject one report for `name` observed at `now`.
    ///
    /// On admission the last-publish time resets and a fresh interval is
    /// drawn, producing an irregular per-target cadence rather than a
    /// fixed clock.
    pub fn should_publish<R: Rng>(&mut self, name: &str, now: Instant, rng: &mut R) -> bool {
        let mean = self.mean_interval;
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| DebounceEntry {
                last_publish: None,
                interval: draw_interval(mean, rng),
            });

        let due = match entry.last_publish {
            None => true,
            Some(last) => now.duration_since(last) >= entry.interval,
        };

        if due {
            entry.last_publish = Some(now);
            entry.interval = draw_interval(mean, rng);
        }
        due
    }
}

fn draw_interval<R: Rng>(mean: Duration, rng: &mut R) -> Duration {
    mean.mul_f64(rng.random_range(0.8..=1.2))
}

/// Run the debounced relay until the object-channel closes or `stop` fires.
pub async fn run_adas(
    config: AdasConfig,
    object_channel: Channel,
    sensor_channel: Channel,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let mut subscriber = Subscriber::join(object_channel).await?;
    let publisher = Publisher::bind(sensor_channel).await?;

    let mut gate = DebounceGate::new(config.mean_interval);
    let mut rng = StdRng::from_os_rng();

    info!(
        sensor = %config.name,
        mean_interval_sec = config.mean_interval.as_secs_f64(),
        listen = %object_channel,
        publish = %sensor_channel,
        "adas sensor started"
    );

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            line = subscriber.recv() => {
                let Some(line) = line else { break };
                match Record::decode(&line) {
                    Record::Object(report) => {
                        if gate.should_publish(&report.name, Instant::now(), &mut rng) {
                            let out = SensorReport {
                                sensor_name: config.name.clone(),
                                x: report.x,
                                y: report.y,
                                t: report.t,
                                noise_std: 0.0,
                                kind: SensorKind::Adas,
                            };
                            publisher.publish_sensor(&out).await;
                            observability::record_report_published(&config.name, SensorKind::Adas.as_str());
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

    debug!(sensor = %config.name, "adas sensor stopped");
    Ok(())
}
