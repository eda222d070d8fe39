//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lap Replay - synchronized lap telemetry playback
#[derive(Parser, Debug)]
#[command(
    name = "lap-replay",
    author,
    version,
    about = "Align lap telemetry of several drivers onto one shared timeline",
    long_about = "Loads one session's lap telemetry, selects each driver's fastest lap, \n\
                  resamples every lap onto a common fixed-rate timeline and replays it \n\
                  with speed, standings and gap readouts."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LAP_REPLAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LAP_REPLAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the synchronized timeline and print a summary
    Sync(SyncArgs),

    /// Replay the synchronized timeline in real time
    Play(PlayArgs),

    /// Validate configuration file without loading telemetry
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `sync` command
#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "session.toml",
        env = "LAP_REPLAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Validate configuration and exit without loading telemetry
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `play` command
#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "session.toml",
        env = "LAP_REPLAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Playback speed multiplier (2.0 = twice real time)
    #[arg(long, default_value = "1.0", value_parser = parse_speed, env = "LAP_REPLAY_SPEED")]
    pub speed: f64,

    /// Stop after this many frames (0 = whole timeline)
    #[arg(long, default_value = "0", env = "LAP_REPLAY_MAX_FRAMES")]
    pub max_frames: usize,

    /// Print a readout every N frames (0 = once per second of playback)
    #[arg(long, default_value = "0")]
    pub print_every: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "LAP_REPLAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also open the provider and list each driver's fastest lap
    #[arg(long)]
    pub laps: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

const MIN_SPEED: f64 = 0.001;

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if speed.is_finite() && speed >= MIN_SPEED {
        Ok(speed)
    } else {
        Err(format!("speed must be at least {MIN_SPEED}, got {value}"))
    }
}
