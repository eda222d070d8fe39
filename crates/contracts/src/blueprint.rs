//! SessionBlueprint - Config Loader output
//!
//! Describes one playback session: which session to load, where telemetry
//! comes from, which drivers to track, and how the timeline is sampled.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::{DriverId, SpeedUnit, TimelineConfig};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete session playback blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SessionBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Session identity
    #[serde(default)]
    #[validate(nested)]
    pub session: SessionInfo,

    /// Telemetry source
    #[serde(default)]
    #[validate(nested)]
    pub source: SourceConfig,

    /// Which drivers to track
    #[serde(default)]
    #[validate(nested)]
    pub drivers: DriverSelection,

    /// Timeline sampling
    #[serde(default)]
    #[validate(nested)]
    pub playback: PlaybackConfig,

    /// Gap readout settings
    #[serde(default)]
    #[validate(nested)]
    pub gap: GapConfig,
}

/// Session identity: year, event, session kind
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionInfo {
    #[validate(range(min = 1950, max = 2100))]
    pub year: u16,

    /// Event name (e.g. "Monaco")
    #[validate(length(min = 1))]
    pub event: String,

    /// Session kind (e.g. "Q", "R", "FP1")
    #[validate(length(min = 1))]
    pub kind: String,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            year: 2023,
            event: "Monaco".to_string(),
            kind: "Q".to_string(),
        }
    }
}

/// Where lap telemetry comes from
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Provider kind
    #[serde(default)]
    pub provider: ProviderKind,

    /// Session export path (required for `file`)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Number of drivers synthesized by the `mock` provider
    #[serde(default = "default_mock_drivers")]
    #[validate(range(min = 1, max = 40))]
    pub mock_drivers: usize,
}

fn default_mock_drivers() -> usize {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            path: None,
            mock_drivers: default_mock_drivers(),
        }
    }
}

/// Telemetry provider kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Deterministic synthetic session
    #[default]
    Mock,
    /// Recorded session export (JSON)
    File,
}

/// Driver tracking selection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DriverSelection {
    /// Track the N fastest laps of the session
    #[serde(default = "default_driver_count")]
    #[validate(range(min = 1, max = 40))]
    pub count: usize,

    /// Explicit driver codes; overrides the ranking when non-empty
    #[serde(default)]
    pub include: Vec<DriverId>,

    /// What to do when a driver's lap is too sparse to interpolate
    #[serde(default)]
    pub on_insufficient: InsufficientDataPolicy,
}

fn default_driver_count() -> usize {
    10
}

impl Default for DriverSelection {
    fn default() -> Self {
        Self {
            count: default_driver_count(),
            include: Vec::new(),
            on_insufficient: InsufficientDataPolicy::default(),
        }
    }
}

/// Policy for drivers whose cleaned lap has fewer than 2 samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientDataPolicy {
    /// Exclude the driver and continue with the rest
    #[default]
    Skip,
    /// Abort the whole session build
    Abort,
}

/// Timeline sampling settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaybackConfig {
    /// Frames per second of the animation
    #[serde(default = "default_fps")]
    #[validate(range(min = 1, max = 240))]
    pub fps: u32,

    /// Total animation length; defaults to the common lap duration (real time)
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, max = 3600.0))]
    pub duration_s: Option<f64>,

    /// Unit of the provider's speed channel
    #[serde(default)]
    pub speed_unit: SpeedUnit,
}

fn default_fps() -> u32 {
    90
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            duration_s: None,
            speed_unit: SpeedUnit::default(),
        }
    }
}

/// Gap readout settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GapConfig {
    /// Below this distance (metres) a pair is reported side by side
    #[serde(default = "default_side_by_side")]
    #[validate(range(min = 0.0))]
    pub side_by_side_m: f64,

    /// Ghost pair; defaults to the two fastest tracked drivers
    #[serde(default)]
    pub pair: Option<(DriverId, DriverId)>,
}

fn default_side_by_side() -> f64 {
    1.0
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            side_by_side_m: default_side_by_side(),
            pair: None,
        }
    }
}

impl SessionBlueprint {
    /// "2023 Monaco Q"
    pub fn session_label(&self) -> String {
        format!(
            "{} {} {}",
            self.session.year, self.session.event, self.session.kind
        )
    }

    /// Resolve the synchronizer config once the common lap duration is known.
    ///
    /// `frame_count = round(duration × fps)`, where duration is the configured
    /// animation length or, when absent, the common duration itself.
    pub fn to_timeline_config(&self, common_duration: f64) -> TimelineConfig {
        let duration = self.playback.duration_s.unwrap_or(common_duration);
        let frames = duration * f64::from(self.playback.fps);
        let frame_count = if frames.is_finite() && frames > 0.0 {
            frames.round() as usize
        } else {
            0
        };
        TimelineConfig {
            frame_count,
            speed_unit: self.playback.speed_unit,
        }
    }
}
