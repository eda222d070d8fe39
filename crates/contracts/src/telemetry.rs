//! RawSample / RawLap - Session Data Provider output
//! DriverLap - Normalizer output

use serde::{Deserialize, Serialize};

use crate::DriverId;

/// One telemetry sample as delivered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Seconds since the start of the lap
    pub timestamp: f64,

    /// Track-plane position (provider units, typically decimetres)
    pub x: f64,
    pub y: f64,

    /// Speed in the provider's native unit (see `SpeedUnit`)
    pub speed: f64,

    /// Distance travelled since the start of the lap (metres)
    pub distance: f64,
}

/// A complete lap for one driver, exactly as received.
///
/// Sample order is not guaranteed; duplicates and reversals may be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLap {
    /// Driver code
    pub driver_id: DriverId,

    /// Lap number within the session, if the provider knows it
    pub lap_number: Option<u32>,

    /// Official lap time in seconds (`None` for in/out or deleted laps)
    pub lap_time: Option<f64>,

    /// Raw samples
    pub samples: Vec<RawSample>,
}

/// A normalized lap: timestamps strictly increasing, channels index-aligned.
///
/// Stored as struct-of-arrays because the synchronizer interpolates each
/// channel independently against the same timestamp column.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverLap {
    pub driver_id: DriverId,
    pub lap_number: Option<u32>,
    pub lap_time: Option<f64>,
    pub timestamps: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub speed: Vec<f64>,
    pub distance: Vec<f64>,
}

impl DriverLap {
    /// Number of retained samples
    #[inline]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First retained timestamp
    pub fn start_time(&self) -> Option<f64> {
        self.timestamps.first().copied()
    }

    /// Last retained timestamp
    pub fn end_time(&self) -> Option<f64> {
        self.timestamps.last().copied()
    }

    /// `last - first`, or 0 for an empty lap
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
