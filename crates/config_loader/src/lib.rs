//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Resolve omitted sensor names
//! - Validate configuration legality
//! - Produce a [`SimBlueprint`]
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("sim.toml")).unwrap();
//! println!("targets: {}", blueprint.targets.count);
//! ```

mod parser;
mod validator;

pub use contracts::SimBlueprint;
pub use parser::ConfigFormat;

use contracts::SimError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SimBlueprint, SimError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<SimBlueprint, SimError> {
        let mut blueprint = parser::parse(content, format)?;
        blueprint.resolve_sensor_names();
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Serialize a SimBlueprint to TOML
    pub fn to_toml(blueprint: &SimBlueprint) -> Result<String, SimError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| SimError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a SimBlueprint to JSON
    pub fn to_json(blueprint: &SimBlueprint) -> Result<String, SimError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| SimError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, SimError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            SimError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| SimError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, SimError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SensorKind;

    const MINIMAL_TOML: &str = r#"
[targets]
count = 2

[[sensors]]
kind = "noisy"
noise_std = 0.5

[[sensors]]
kind = "tacan"
radar = { x = 0.0, y = 0.0 }
rotation_period_sec = 30.0
"#;

    #[test]
    fn load_minimal_toml() {
        let blueprint = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();

        assert_eq!(blueprint.targets.count, 2);
        assert_eq!(blueprint.targets.radius, 10.0);
        assert_eq!(blueprint.sensors.len(), 2);
        assert_eq!(blueprint.sensor_name(0), "noisy1");
        assert_eq!(blueprint.sensor_name(1), "tacan1");
        assert_eq!(blueprint.sensors[1].kind, SensorKind::Tacan);
        assert_eq!(blueprint.supervisor.idle_timeout_sec, 300.0);
    }

    #[test]
    fn load_json() {
        let json = r#"{
            "targets": { "count": 1 },
            "sensors": [{ "kind": "adas", "mean_interval_sec": 5.0 }]
        }"#;

        let blueprint = ConfigLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(blueprint.sensors[0].mean_interval_sec, 5.0);
    }

    #[test]
    fn toml_roundtrip() {
        let blueprint = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let rendered = ConfigLoader::to_toml(&blueprint).unwrap();
        let reparsed = ConfigLoader::load_from_str(&rendered, ConfigFormat::Toml).unwrap();
        assert_eq!(reparsed.targets.count, blueprint.targets.count);
        assert_eq!(reparsed.sensors.len(), blueprint.sensors.len());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = ConfigLoader::load_from_path(Path::new("sim.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
