//! CLI argument definitions using clap.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Channel;

/// Trackfuse - distributed position-sensor fusion simulation
#[derive(Parser, Debug)]
#[command(
    name = "trackfuse",
    author,
    version,
    about = "Multicast sensor-fusion simulation",
    long_about = "Emulates a distributed network of position sensors tracking moving \n\
                  targets over a UDP multicast bus, fuses their noisy reports into a \n\
                  single estimate, and supervises the whole fleet of processes.\n\n\
                  `run` launches and supervises a full simulation; `emit`, `sensor` and \n\
                  `fuse` run the individual processes the supervisor manages."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRACKFUSE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TRACKFUSE_LOG_FORMAT"
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch and supervise a full simulation
    Run(RunArgs),

    /// Run one target emitter process
    Emit(EmitArgs),

    /// Run one sensor agent process
    Sensor(SensorArgs),

    /// Run the fusion reducer process
    Fuse(FuseArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Object-channel addressing (target emitters -> sensor agents)
#[derive(Parser, Debug, Clone)]
pub struct ObjectChannelArgs {
    /// Object-channel multicast group
    #[arg(long, default_value = "224.1.1.1", env = "TRACKFUSE_OBJECT_GROUP")]
    pub object_group: Ipv4Addr,

    /// Object-channel port
    #[arg(long, default_value_t = 5004, env = "TRACKFUSE_OBJECT_PORT")]
    pub object_port: u16,
}

impl ObjectChannelArgs {
    pub fn channel(&self) -> Channel {
        Channel::new(self.object_group, self.object_port)
    }
}

/// Sensor-channel addressing (sensor agents -> fusion/monitor)
#[derive(Parser, Debug, Clone)]
pub struct SensorChannelArgs {
    /// Sensor-channel multicast group
    #[arg(long, default_value = "224.1.1.2", env = "TRACKFUSE_SENSOR_GROUP")]
    pub sensor_group: Ipv4Addr,

    /// Sensor-channel port
    #[arg(long, default_value_t = 5005, env = "TRACKFUSE_SENSOR_PORT")]
    pub sensor_port: u16,
}

impl SensorChannelArgs {
    pub fn channel(&self) -> Channel {
        Channel::new(self.sensor_group, self.sensor_port)
    }
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "sim.toml", env = "TRACKFUSE_CONFIG")]
    pub config: PathBuf,

    /// Override idle timeout (seconds) from configuration
    #[arg(long, env = "TRACKFUSE_IDLE_TIMEOUT")]
    pub idle_timeout: Option<f64>,

    /// Force headless mode (no visualizer)
    #[arg(long, conflicts_with = "visualize")]
    pub headless: bool,

    /// Launch the configured visualizer
    #[arg(long)]
    pub visualize: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRACKFUSE_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Target name/id
    #[arg(long, default_value = "target1")]
    pub name: String,

    /// Start position x
    #[arg(long, allow_negative_numbers = true)]
    pub start_x: f64,

    /// Start position y
    #[arg(long, allow_negative_numbers = true)]
    pub start_y: f64,

    /// Destination position x
    #[arg(long, allow_negative_numbers = true)]
    pub end_x: f64,

    /// Destination position y
    #[arg(long, allow_negative_numbers = true)]
    pub end_y: f64,

    /// Time to move from start to destination (seconds)
    #[arg(long, default_value_t = 10.0)]
    pub duration: f64,

    /// Publish interval (seconds)
    #[arg(long, default_value_t = 0.1)]
    pub interval: f64,

    #[command(flatten)]
    pub object: ObjectChannelArgs,
}

/// Arguments for the `sensor` command
#[derive(Parser, Debug, Clone)]
pub struct SensorArgs {
    /// Sensor name/id
    #[arg(long, default_value = "sensor1")]
    pub name: String,

    /// Producer variant
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Gaussian noise std-dev (noisy)
    #[arg(long, default_value_t = 0.5)]
    pub noise_std: f64,

    /// Mean publish interval in seconds (adas)
    #[arg(long, default_value_t = 15.0)]
    pub mean_interval: f64,

    /// Radar base-station x position (tacan)
    #[arg(long, allow_negative_numbers = true, required_if_eq("kind", "tacan"))]
    pub radar_x: Option<f64>,

    /// Radar base-station y position (tacan)
    #[arg(long, allow_negative_numbers = true, required_if_eq("kind", "tacan"))]
    pub radar_y: Option<f64>,

    /// Full rotation period in seconds (tacan)
    #[arg(long, default_value_t = 60.0)]
    pub rotation_period: f64,

    #[command(flatten)]
    pub object: ObjectChannelArgs,

    #[command(flatten)]
    pub sensor: SensorChannelArgs,
}

/// Arguments for the `fuse` command
#[derive(Parser, Debug, Clone)]
pub struct FuseArgs {
    /// Recompute interval (seconds)
    #[arg(long, default_value_t = 0.1)]
    pub tick: f64,

    /// Per-source staleness TTL in seconds (0 = no eviction)
    #[arg(long, default_value_t = 0.0)]
    pub stale_after: f64,

    #[command(flatten)]
    pub sensor: SensorChannelArgs,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "sim.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "sim.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-sensor detail
    #[arg(long)]
    pub sensors: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormatArg {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Sensor kind as a CLI value
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    Noisy,
    Adas,
    Tacan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sensor_subcommand_parses_tacan() {
        let cli = Cli::parse_from([
            "trackfuse",
            "sensor",
            "--kind",
            "tacan",
            "--name",
            "tacan1",
            "--radar-x",
            "1.5",
            "--radar-y",
            "-2.0",
            "--rotation-period",
            "30",
        ]);

        match cli.command {
            Commands::Sensor(args) => {
                assert!(matches!(args.kind, KindArg::Tacan));
                assert_eq!(args.radar_x, Some(1.5));
                assert_eq!(args.rotation_period, 30.0);
                assert_eq!(args.object.channel().to_string(), "224.1.1.1:5004");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn tacan_requires_radar_position() {
        let result = Cli::try_parse_from(["trackfuse", "sensor", "--kind", "tacan"]);
        assert!(result.is_err());
    }

    #[test]
    fn emit_subcommand_parses_path() {
        let cli = Cli::parse_from([
            "trackfuse",
            "emit",
            "--name",
            "target1",
            "--start-x",
            "10",
            "--start-y",
            "0",
            "--end-x",
            "-7.07",
            "--end-y",
            "7.07",
            "--duration",
            "5",
        ]);

        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.start_x, 10.0);
                assert_eq!(args.duration, 5.0);
                assert_eq!(args.interval, 0.1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
