//! Target emitter - linear interpolation from start to destination.
//!
//! Publishes one ObjectReport per tick on the object-channel and exits once
//! normalized progress reaches 1.0. A finished trajectory is an expected
//! terminal state; the supervisor does not restart emitters.

use std::time::Duration;

use bus::Publisher;
use contracts::{Channel, ObjectReport, SimError};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

/// Emitter construction parameters
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Target name carried in every report
    pub name: String,

    /// Start position
    pub start: (f64, f64),

    /// Destination position
    pub end: (f64, f64),

    /// Time to traverse start -> destination
    pub duration: Duration,

    /// Publish interval
    pub interval: Duration,
}

/// Linear interpolation between two points at progress `t` (0..1).
pub fn lerp(p1: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
    (p1.0 + (p2.0 - p1.0) * t, p1.1 + (p2.1 - p1.1) * t)
}

/// Run the emitter until the trajectory completes or `stop` fires.
pub async fn run_emitter(
    config: EmitterConfig,
    object_channel: Channel,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let publisher = Publisher::bind(object_channel).await?;
    let started = Instant::now();
    let mut ticker = tokio::time::interval(config.interval);

    info!(
        emitter = %config.name,
        start = ?config.start,
        end = ?config.end,
        duration_sec = config.duration.as_secs_f64(),
        "emitter started"
    );

    loop {
        tokio::select! {
            _ = stop.changed() => {
                debug!(emitter = %config.name, "emitter stop requested");
                break;
            }
            _ = ticker.tick() => {
                let t = (started.elapsed().as_secs_f64() / config.duration.as_secs_f64()).min(1.0);
                let (x, y) = lerp(config.start, config.end, t);

                let report = ObjectReport {
                    name: config.name.clone(),
                    x,
                    y,
                    t,
                };
                publisher.publish_object(&report).await;

                if t >= 1.0 {
                    info!(emitter = %config.name, "destination reached");
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let p1 = (0.0, 0.0);
        let p2 = (10.0, -4.0);
        assert_eq!(lerp(p1, p2, 0.0), p1);
        assert_eq!(lerp(p1, p2, 1.0), p2);
        assert_eq!(lerp(p1, p2, 0.5), (5.0, -2.0));
    }

    #[tokio::test]
    async fn emitter_terminates_after_duration() {
        let (_tx, stop) = watch::channel(false);
        let config = EmitterConfig {
            name: "t1".into(),
            start: (0.0, 0.0),
            end: (1.0, 1.0),
            duration: Duration::from_millis(50),
            interval: Duration::from_millis(10),
        };
        let channel = Channel::new(std::net::Ipv4Addr::LOCALHOST, 19810);

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            run_emitter(config, channel, stop),
        )
        .await;
        assert!(result.is_ok(), "emitter should exit on its own");
    }

    #[tokio::test]
    async fn emitter_obeys_stop_signal() {
        let (tx, stop) = watch::channel(false);
        let config = EmitterConfig {
            name: "t1".into(),
            start: (0.0, 0.0),
            end: (1.0, 1.0),
            duration: Duration::from_secs(3600),
            interval: Duration::from_millis(10),
        };
        let channel = Channel::new(std::net::Ipv4Addr::LOCALHOST, 19811);

        let handle = tokio::spawn(run_emitter(config, channel, stop));
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.is_ok(), "emitter should exit promptly on stop");
    }
}
