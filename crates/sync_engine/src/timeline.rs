//! Shared time grid.

use contracts::{ContractError, MAX_FRAMES};
use serde::Serialize;

/// N evenly spaced grid times over `[0, common_duration]`, endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedTimeline {
    common_duration: f64,
    times: Vec<f64>,
}

impl SharedTimeline {
    /// Build the grid.
    ///
    /// # Errors
    /// - `NoOverlap` when `common_duration` is not a positive finite number
    /// - `InvalidFrameCount` when `frame_count` is outside `2..=MAX_FRAMES`
    pub fn new(common_duration: f64, frame_count: usize) -> Result<Self, ContractError> {
        if !(common_duration.is_finite() && common_duration > 0.0) {
            return Err(ContractError::no_overlap(format!(
                "common duration {common_duration} is not positive"
            )));
        }
        if !(2..=MAX_FRAMES).contains(&frame_count) {
            return Err(ContractError::InvalidFrameCount {
                requested: frame_count,
            });
        }

        let last = frame_count - 1;
        let times = (0..frame_count)
            .map(|i| {
                if i == last {
                    common_duration
                } else {
                    common_duration * i as f64 / last as f64
                }
            })
            .collect();

        Ok(Self {
            common_duration,
            times,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn common_duration(&self) -> f64 {
        self.common_duration
    }

    /// Spacing between adjacent grid points
    pub fn step(&self) -> f64 {
        self.common_duration / (self.times.len() - 1) as f64
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Grid time at index `i`
    pub fn time_at(&self, i: usize) -> Option<f64> {
        self.times.get(i).copied()
    }

    /// Index for a playback position given in percent (0..=100, clamped).
    pub fn frame_for_progress(&self, percent: f64) -> usize {
        let last = self.times.len() - 1;
        let pct = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        ((pct / 100.0 * last as f64).floor() as usize).min(last)
    }

    /// Playback position of index `i` in percent
    pub fn progress_of(&self, i: usize) -> f64 {
        let last = self.times.len() - 1;
        i.min(last) as f64 / last as f64 * 100.0
    }
}
