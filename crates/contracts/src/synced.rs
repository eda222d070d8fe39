//! SyncedFrame / Gap - Timeline Synchronizer output
//!
//! Per-driver values on the shared timeline.

use serde::{Deserialize, Serialize};

/// Interpolated state of one driver at one grid index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncedFrame {
    /// Grid time (seconds since timeline start)
    pub t: f64,

    /// Driver-local lap time the values were sampled at (`first_ts + t`)
    pub source_time: f64,

    pub x: f64,
    pub y: f64,

    /// Speed in the provider's native unit
    pub speed: f64,

    /// Cumulative lap distance (metres)
    pub distance: f64,
}

/// Separation between two drivers at one grid index.
///
/// Positive values mean the first driver of the pair is ahead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Distance differential (metres)
    pub distance_m: f64,

    /// Time-equivalent of the distance gap (seconds).
    ///
    /// `None` when the pair's mean speed is zero, i.e. the gap has no
    /// meaningful time equivalent.
    pub time_s: Option<f64>,
}

impl Gap {
    /// Gap seen from the other driver's side
    pub fn reversed(self) -> Self {
        Self {
            distance_m: -self.distance_m,
            time_s: self.time_s.map(|t| -t),
        }
    }
}
