//! Piecewise-linear interpolation against a strictly increasing time column.
//!
//! Two entry points share the same bracketing rule:
//! - [`interpolate_at`] binary-searches a single query
//! - [`LapCursor`] sweeps monotone queries in one pass, which is what the
//!   synchronizer uses since grid times only ever increase
//!
//! Queries outside `[ts[0], ts[last]]` clamp to the end values. The grid
//! never asks for those, but clamping keeps rounding at the edges harmless.

use contracts::{DriverLap, SyncedFrame};

/// Interpolate `values` (aligned to `times`) at `query`.
///
/// `times` must be non-empty, strictly increasing and as long as `values`.
pub fn interpolate_at(times: &[f64], values: &[f64], query: f64) -> f64 {
    let hi = times.partition_point(|&t| t <= query);
    lerp_bracket(times, values, hi, query)
}

/// Interpolation given `hi`, the index of the first sample later than `query`.
#[inline]
fn lerp_bracket(times: &[f64], values: &[f64], hi: usize, query: f64) -> f64 {
    if hi == 0 {
        return values[0];
    }
    if hi >= times.len() {
        return values[times.len() - 1];
    }
    let lo = hi - 1;
    let w = (query - times[lo]) / (times[hi] - times[lo]);
    values[lo] + w * (values[hi] - values[lo])
}

/// Forward-only interpolation cursor over one driver's lap.
#[derive(Debug)]
pub struct LapCursor<'a> {
    lap: &'a DriverLap,
    hi: usize,
}

impl<'a> LapCursor<'a> {
    pub fn new(lap: &'a DriverLap) -> Self {
        Self { lap, hi: 0 }
    }

    /// Interpolate every channel at `source_time`.
    ///
    /// Successive calls must not go backwards in time; the cursor only advances.
    pub fn sample(&mut self, grid_time: f64, source_time: f64) -> SyncedFrame {
        let times = &self.lap.timestamps;
        while self.hi < times.len() && times[self.hi] <= source_time {
            self.hi += 1;
        }
        let at = |values: &[f64]| lerp_bracket(times, values, self.hi, source_time);

        SyncedFrame {
            t: grid_time,
            source_time,
            x: at(&self.lap.x),
            y: at(&self.lap.y),
            speed: at(&self.lap.speed),
            distance: at(&self.lap.distance),
        }
    }
}

/// Resample a lap onto lap-relative grid times.
///
/// Grid time `t` maps to `first_timestamp + t`, clamped to the last sample.
pub fn resample(lap: &DriverLap, grid: &[f64]) -> Vec<SyncedFrame> {
    let (Some(first), Some(last)) = (lap.start_time(), lap.end_time()) else {
        return Vec::new();
    };
    let mut cursor = LapCursor::new(lap);
    grid.iter()
        .map(|&t| cursor.sample(t, (first + t).min(last)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(times: &[f64], x: &[f64]) -> DriverLap {
        DriverLap {
            driver_id: "TST".into(),
            lap_number: None,
            lap_time: None,
            timestamps: times.to_vec(),
            x: x.to_vec(),
            y: x.iter().map(|v| v * 2.0).collect(),
            speed: vec![100.0; times.len()],
            distance: x.to_vec(),
        }
    }

    #[test]
    fn test_exact_sample_times_return_samples() {
        let times = [0.0, 1.0, 2.0];
        let values = [0.0, 10.0, 20.0];
        for (t, v) in times.iter().zip(values) {
            assert_eq!(interpolate_at(&times, &values, *t), v);
        }
    }

    #[test]
    fn test_midpoints_are_linear() {
        let times = [0.0, 0.5, 1.5, 2.5];
        let values = [0.0, 5.0, 15.0, 25.0];
        assert_eq!(interpolate_at(&times, &values, 1.0), 10.0);
        assert_eq!(interpolate_at(&times, &values, 2.0), 20.0);
        assert_eq!(interpolate_at(&times, &values, 0.25), 2.5);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let times = [1.0, 2.0];
        let values = [3.0, 4.0];
        assert_eq!(interpolate_at(&times, &values, 0.0), 3.0);
        assert_eq!(interpolate_at(&times, &values, 9.0), 4.0);
    }

    #[test]
    fn test_cursor_matches_binary_search() {
        let lap = lap(&[0.0, 0.3, 0.35, 1.2, 2.0, 2.05], &[0.0, 1.0, 4.0, 2.0, 8.0, 9.0]);
        let grid: Vec<f64> = (0..=40).map(|i| 2.05 * i as f64 / 40.0).collect();
        let frames = resample(&lap, &grid);
        assert_eq!(frames.len(), grid.len());
        for (frame, t) in frames.iter().zip(&grid) {
            assert_eq!(frame.x, interpolate_at(&lap.timestamps, &lap.x, *t));
            assert_eq!(frame.y, interpolate_at(&lap.timestamps, &lap.y, *t));
        }
    }

    #[test]
    fn test_resample_is_lap_relative() {
        let lap = lap(&[5.0, 6.0, 7.0], &[0.0, 10.0, 20.0]);
        let frames = resample(&lap, &[0.0, 1.0, 2.0]);
        let xs: Vec<f64> = frames.iter().map(|f| f.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0]);
        assert_eq!(frames[1].t, 1.0);
        assert_eq!(frames[1].source_time, 6.0);
    }

    #[test]
    fn test_resample_clamps_to_last_sample() {
        let lap = lap(&[0.0, 1.0], &[0.0, 10.0]);
        let frames = resample(&lap, &[0.0, 1.0 + 1e-12]);
        assert_eq!(frames[1].source_time, 1.0);
        assert_eq!(frames[1].x, 10.0);
    }
}
