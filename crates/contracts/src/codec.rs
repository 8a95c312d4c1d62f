//! Wire codec for bus datagrams.
//!
//! Each datagram is one comma-separated ASCII line with a leading type tag:
//!
//! ```text
//! object,<name>,<x:.3>,<y:.3>,<t:.3>
//! sensor,<name>,<x:.3>,<y:.3>,<t:.3>,<noiseStd:.3|ADAS|TACAN>
//! ```
//!
//! Decoding is a closed tagged-variant step: anything that does not parse to
//! a known tag with the exact expected field count maps to `Record::Unknown`.
//! Dropping `Unknown` is the defined behavior for malformed or foreign
//! traffic, not an error.

use crate::report::{ObjectReport, SensorKind, SensorReport};

/// One decoded datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A target position report (object-channel)
    Object(ObjectReport),

    /// A sensor position report (sensor-channel)
    Sensor(SensorReport),

    /// Malformed or foreign traffic; consumers drop this silently
    Unknown,
}

impl Record {
    /// Decode one datagram line. Fields tolerate surrounding whitespace.
    pub fn decode(line: &str) -> Record {
        let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();

        match parts.first() {
            Some(&"object") if parts.len() == 5 => decode_object(&parts),
            Some(&"sensor") if parts.len() == 6 => decode_sensor(&parts),
            _ => Record::Unknown,
        }
    }
}

fn decode_object(parts: &[&str]) -> Record {
    let (Some(x), Some(y), Some(t)) = (
        parse_coord(parts[2]),
        parse_coord(parts[3]),
        parse_coord(parts[4]),
    ) else {
        return Record::Unknown;
    };

    Record::Object(ObjectReport {
        name: parts[1].to_string(),
        x,
        y,
        t,
    })
}

fn decode_sensor(parts: &[&str]) -> Record {
    let (Some(x), Some(y), Some(t)) = (
        parse_coord(parts[2]),
        parse_coord(parts[3]),
        parse_coord(parts[4]),
    ) else {
        return Record::Unknown;
    };

    // Final field is either a numeric std-dev (continuous relay) or a
    // producer tag; a tagged report carries no claimed noise figure and
    // fuses with weight 1.0.
    let (noise_std, kind) = match parts[5] {
        "ADAS" => (0.0, SensorKind::Adas),
        "TACAN" => (0.0, SensorKind::Tacan),
        field => match parse_coord(field) {
            Some(std) if std >= 0.0 => (std, SensorKind::Noisy),
            _ => return Record::Unknown,
        },
    };

    Record::Sensor(SensorReport {
        sensor_name: parts[1].to_string(),
        x,
        y,
        t,
        noise_std,
        kind,
    })
}

fn parse_coord(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ObjectReport {
    /// Encode as a single wire line (no trailing newline).
    pub fn encode(&self) -> String {
        format!(
            "object,{},{:.3},{:.3},{:.3}",
            self.name, self.x, self.y, self.t
        )
    }
}

impl SensorReport {
    /// Encode as a single wire line (no trailing newline).
    pub fn encode(&self) -> String {
        let noise_field = match self.kind {
            SensorKind::Noisy => format!("{:.3}", self.noise_std),
            SensorKind::Adas => "ADAS".to_string(),
            SensorKind::Tacan => "TACAN".to_string(),
        };
        format!(
            "sensor,{},{:.3},{:.3},{:.3},{}",
            self.sensor_name, self.x, self.y, self.t, noise_field
        )
    }
}
