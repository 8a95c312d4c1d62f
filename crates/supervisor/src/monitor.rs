//! Passive bus-activity monitor.
//!
//! A background task subscribed to the sensor-channel stamps a shared clock
//! on every received datagram - decoded or not, mere receipt counts as
//! activity. The supervise loop reads the clock for idle detection.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bus::Subscriber;
use contracts::{Channel, SimError};
use tokio::sync::watch;
use tracing::debug;

/// Shared last-activity timestamp.
///
/// Lock-guarded so the monitor task's writes and the supervise loop's reads
/// cannot tear.
#[derive(Clone)]
pub struct ActivityClock(Arc<Mutex<Instant>>);

impl ActivityClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    /// Stamp now as the last-seen activity.
    pub fn touch(&self) {
        *self.lock() = Instant::now();
    }

    /// Time since the last stamped activity.
    pub fn idle_for(&self) -> Duration {
        self.lock().elapsed()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Instant> {
        // A poisoned lock still holds a valid Instant
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the passive listener until `stop` fires.
pub async fn run_activity_monitor(
    sensor_channel: Channel,
    clock: ActivityClock,
    mut stop: watch::Receiver<bool>,
) -> Result<(), SimError> {
    let mut subscriber = Subscriber::join(sensor_channel).await?;

    debug!(channel = %sensor_channel, "activity monitor started");

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            line = subscriber.recv() => {
                if line.is_none() {
                    break;
                }
                clock.touch();
            }
        }
    }

    debug!("activity monitor stopped");
    Ok(())
}
