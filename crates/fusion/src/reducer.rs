//! Reducer loop - drain the sensor-channel, recompute on a fixed tick.

use std::time::{Duration, Instant};

use bus::Subscriber;
use contracts::{Channel, Record, SimError};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::engine::FusionEngine;

/// Reducer construction parameters
#[derive(Debug, Clone)]
pub struct ReducerConfig {
    /// Recompute interval
    pub tick: Duration,

    /// Optional per-source staleness TTL
    pub stale_after: Option<Duration>,
}

/// Run the fusion reducer until the sensor-channel closes or `stop` fires.
///
/// Each tick drains every pending datagram, updates the per-source map,
/// then recomputes; update-then-recompute is atomic relative to the tick
/// but not relative to agents' publish timing.
pub async fn run_reducer(
    config: ReducerConfig,
    sensor_channel: Channel,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let mut subscriber = Subscriber::join(sensor_channel).await?;
    let mut engine = FusionEngine::with_stale_after(config.stale_after);
    let mut ticker = tokio::time::interval(config.tick);

    info!(
        listen = %sensor_channel,
        tick_sec = config.tick.as_secs_f64(),
        "fusion reducer started"
    );

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {
                while let Some(line) = subscriber.try_recv() {
                    match Record::decode(&line) {
                        Record::Sensor(report) => {
                            engine.insert(report, Instant::now());
                        }
                        // Object-tagged traffic on a shared channel is not ours
                        Record::Object(_) => {}
                        Record::Unknown => {
                            observability::record_record_dropped("fusion");
                        }
                    }
                }

                // Undefined (no sources yet) is not reported
                if let Some(estimate) = engine.estimate(Instant::now()) {
                    observability::record_fused_estimate(estimate.contributing);
                    info!(
                        x = format!("{:.3}", estimate.x),
                        y = format!("{:.3}", estimate.y),
                        sources = estimate.contributing,
                        "fused position"
                    );
                }
            }
        }
    }

    debug!("fusion reducer stopped");
    Ok(())
}
