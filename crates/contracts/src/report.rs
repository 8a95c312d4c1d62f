//! Report types carried on the two bus channels.

use serde::{Deserialize, Serialize};

/// Position report emitted by a target process.
///
/// Immutable once sent; `t` is normalized progress along the path (0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectReport {
    /// Target name/id
    pub name: String,

    /// Position x
    pub x: f64,

    /// Position y
    pub y: f64,

    /// Normalized path progress, 0..1
    pub t: f64,
}

/// Position report republished by a sensor agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    /// Sensor name/id (fusion keys its per-source map on this)
    pub sensor_name: String,

    /// Reported position x
    pub x: f64,

    /// Reported position y
    pub y: f64,

    /// Progress copied from the accepted object report
    pub t: f64,

    /// Claimed noise std-dev. 0 means "unspecified" and fuses with
    /// weight 1.0 rather than causing a division error.
    pub noise_std: f64,

    /// Which producer variant published this report
    pub kind: SensorKind,
}

/// Sensor producer variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Continuous relay with additive Gaussian noise
    Noisy,
    /// Debounced relay with a randomized per-target cadence
    Adas,
    /// Rotating-scan gate at a fixed radar position
    Tacan,
}

impl SensorKind {
    /// Lowercase name, used for default sensor naming and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Noisy => "noisy",
            SensorKind::Adas => "adas",
            SensorKind::Tacan => "tacan",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best position estimate over all currently-known sources.
///
/// The Undefined state (no sources, zero total weight) is represented as
/// `None` at the API level and must not be reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedEstimate {
    /// Weighted mean x
    pub x: f64,

    /// Weighted mean y
    pub y: f64,

    /// Number of sources contributing to this estimate
    pub contributing: usize,
}
