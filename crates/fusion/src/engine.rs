//! Fusion engine - latest-per-source map + inverse-variance weighting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use contracts::{FusedEstimate, SensorReport};

struct SourceEntry {
    report: SensorReport,
    updated: Instant,
}

/// Stateless-but-order-sensitive fusion state.
///
/// Holds at most one report per distinct `sensor_name`; a new report for an
/// existing name overwrites it unconditionally - there is no ordering or
/// timestamp check, so a stale out-of-order report can overwrite a newer
/// one (known gap, kept as-is).
///
/// Sources never seen again keep their weight in every estimate until the
/// process restarts, unless an optional staleness TTL is configured.
pub struct FusionEngine {
    sources: HashMap<String, SourceEntry>,
    stale_after: Option<Duration>,
}

impl FusionEngine {
    pub fn new() -> Self {
        Self::with_stale_after(None)
    }

    /// `stale_after` evicts sources not updated within the TTL before each
    /// estimate. `None` keeps the original unbounded behavior.
    pub fn with_stale_after(stale_after: Option<Duration>) -> Self {
        Self {
            sources: HashMap::new(),
            stale_after,
        }
    }

    /// Overwrite the latest report for `report.sensor_name`.
    pub fn insert(&mut self, report: SensorReport, now: Instant) {
        self.sources.insert(
            report.sensor_name.clone(),
            SourceEntry {
                report,
                updated: now,
            },
        );
    }

    /// Number of currently-known sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Weighted position estimate over all currently-known sources, or
    /// `None` (Undefined) when total weight is zero.
    ///
    /// weight(r) = 1 / noise_std^2 when noise_std > 0, else 1.0 - classic
    /// inverse-variance weighting; sensors claiming lower noise dominate.
    pub fn estimate(&mut self, now: Instant) -> Option<FusedEstimate> {
        if let Some(ttl) = self.stale_after {
            self.sources
                .retain(|_, entry| now.duration_since(entry.updated) <= ttl);
        }

        let mut weighted_x = 0.0;
        let mut weighted_y = 0.0;
        let mut weight_total = 0.0;

        for entry in self.sources.values() {
            let report = &entry.report;
            let weight = if report.noise_std > 0.0 {
                1.0 / (report.noise_std * report.noise_std)
            } else {
                1.0
            };
            weighted_x += report.x * weight;
            weighted_y += report.y * weight;
            weight_total += weight;
        }

        if weight_total == 0.0 {
            return None;
        }

        Some(FusedEstimate {
            x: weighted_x / weight_total,
            y: weighted_y / weight_total,
            contributing: self.sources.len(),
        })
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new()
    }
}
