//! Timeline synchronizer configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Upper bound on grid points per driver (an hour at 240 fps, with headroom)
pub const MAX_FRAMES: usize = 1_000_000;

/// Synchronizer configuration, resolved from a `SessionBlueprint`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Number of grid points (frames); must be in `2..=MAX_FRAMES`
    pub frame_count: usize,

    /// Unit of the provider's speed channel
    #[serde(default)]
    pub speed_unit: SpeedUnit,
}

impl TimelineConfig {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            speed_unit: SpeedUnit::default(),
        }
    }

    pub fn with_speed_unit(mut self, speed_unit: SpeedUnit) -> Self {
        self.speed_unit = speed_unit;
        self
    }
}

/// Native unit of the speed channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    /// Kilometres per hour
    #[default]
    Kmh,
    /// Miles per hour
    Mph,
    /// Metres per second
    Mps,
}

impl SpeedUnit {
    /// Convert a value in this unit to metres per second
    #[inline]
    pub fn to_mps(self, value: f64) -> f64 {
        match self {
            SpeedUnit::Kmh => value / 3.6,
            SpeedUnit::Mph => value * 0.447_04,
            SpeedUnit::Mps => value,
        }
    }

    /// Display suffix
    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "km/h",
            SpeedUnit::Mph => "mph",
            SpeedUnit::Mps => "m/s",
        }
    }
}
