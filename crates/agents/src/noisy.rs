//! Noisy sensor - continuous relay with additive Gaussian noise.
//!
//! No internal timer: every accepted object report is republished
//! immediately, so the publish rate is bounded only by the emitter's rate.

use bus::{Publisher, Subscriber};
use contracts::{Channel, ObjectReport, Record, SensorKind, SensorReport, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tokio::sync::watch;
use tracing::{debug, info};

/// Noisy agent construction parameters
#[derive(Debug, Clone)]
pub struct NoisyConfig {
    /// Sensor name carried in every published report
    pub name: String,

    /// Gaussian noise std-dev applied independently to x and y
    pub noise_std: f64,
}

/// Apply zero-mean Gaussian noise to a report's position.
fn perturb<R: Rng>(
    report: &ObjectReport,
    name: &str,
    noise_std: f64,
    noise: &Normal<f64>,
    rng: &mut R,
) -> SensorReport {
    SensorReport {
        sensor_name: name.to_string(),
        x: report.x + noise.sample(rng),
        y: report.y + noise.sample(rng),
        t: report.t,
        noise_std,
        kind: SensorKind::Noisy,
    }
}

/// Run the noisy relay until the object-channel closes or `stop` fires.
pub async fn run_noisy(
    config: NoisyConfig,
    object_channel: Channel,
    sensor_channel: Channel,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let mut subscriber = Subscriber::join(object_channel).await?;
    let publisher = Publisher::bind(sensor_channel).await?;

    let noise = Normal::new(0.0, config.noise_std)
        .map_err(|e| SimError::Other(format!("invalid noise_std {}: {e}", config.noise_std)))?;
    let mut rng = StdRng::from_os_rng();

    info!(
        sensor = %config.name,
        noise_std = config.noise_std,
        listen = %object_channel,
        publish = %sensor_channel,
        "noisy sensor started"
    );

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            line = subscriber.recv() => {
                let Some(line) = line else { break };
                match Record::decode(&line) {
                    Record::Object(report) => {
                        let out = perturb(&report, &config.name, config.noise_std, &noise, &mut rng);
                        publisher.publish_sensor(&out).await;
                        observability::record_report_published(&config.name, SensorKind::Noisy.as_str());
                    }
                    // Sensor-tagged traffic on a shared channel is not ours
                    Record::Sensor(_) => {}
                    Record::Unknown => {
                        observability::record_record_dropped(&config.name);
                    }
                }
            }
        }
    }

    debug!(sensor = %config.name, "noisy sensor stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturb_keeps_identity_fields() {
        let report = ObjectReport {
            name: "t1".into(),
            x: 3.0,
            y: -1.0,
            t: 0.4,
        };
        let noise = Normal::new(0.0, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let out = perturb(&report, "noisy1", 0.5, &noise, &mut rng);

        assert_eq!(out.sensor_name, "noisy1");
        assert_eq!(out.t, 0.4);
        assert_eq!(out.noise_std, 0.5);
        assert_eq!(out.kind, SensorKind::Noisy);
    }

    #[test]
    fn zero_noise_is_a_passthrough() {
        let report = ObjectReport {
            name: "t1".into(),
            x: 3.0,
            y: -1.0,
            t: 0.4,
        };
        let noise = Normal::new(0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let out = perturb(&report, "noisy1", 0.0, &noise, &mut rng);
        assert_eq!(out.x, report.x);
        assert_eq!(out.y, report.y);
    }

    #[test]
    fn noise_scatter_tracks_configured_std() {
        let report = ObjectReport {
            name: "t1".into(),
            x: 0.0,
            y: 0.0,
            t: 0.0,
        };
        let std = 2.0;
        let noise = Normal::new(0.0, std).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let n = 2000;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let out = perturb(&report, "noisy1", std, &noise, &mut rng);
            sum_sq += out.x * out.x;
        }
        let sample_std = (sum_sq / n as f64).sqrt();

        // Loose 3-sigma-style bound; seeded rng keeps this deterministic
        assert!(
            (sample_std - std).abs() < 0.3,
            "sample std {sample_std} too far from {std}"
        );
    }
}
