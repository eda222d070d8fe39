//! Timeline and playback metrics
//!
//! Prometheus-facing recorders plus an in-memory aggregator for the
//! end-of-run summary.

use contracts::Gap;
use metrics::{counter, gauge, histogram};

/// Record a successful timeline build.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_timeline_build;
///
/// let dataset = synchronizer.build(&laps)?;
/// record_timeline_build(dataset.tracks().len(), dataset.len(), dataset.common_duration(), 3.2);
/// ```
pub fn record_timeline_build(drivers: usize, frames: usize, common_duration_s: f64, elapsed_ms: f64) {
    counter!("lap_replay_timeline_builds_total", "status" => "ok").increment(1);
    gauge!("lap_replay_timeline_drivers").set(drivers as f64);
    gauge!("lap_replay_timeline_frames").set(frames as f64);
    gauge!("lap_replay_timeline_common_duration_s").set(common_duration_s);
    histogram!("lap_replay_timeline_build_ms").record(elapsed_ms);
}

/// Record a failed timeline build
pub fn record_timeline_failure(reason: &'static str) {
    counter!(
        "lap_replay_timeline_builds_total",
        "status" => "error",
        "reason" => reason
    )
    .increment(1);
}

/// Record a driver excluded before the build
pub fn record_driver_skipped(driver_id: &str) {
    counter!(
        "lap_replay_drivers_skipped_total",
        "driver" => driver_id.to_string()
    )
    .increment(1);
}

/// Record one played frame
pub fn record_playback_frame(index: usize) {
    counter!("lap_replay_playback_frames_total").increment(1);
    gauge!("lap_replay_playback_frame_index").set(index as f64);
}

/// Record the ghost-pair gap at the current frame
pub fn record_gap(pair: &str, gap: &Gap) {
    gauge!("lap_replay_gap_distance_m", "pair" => pair.to_string()).set(gap.distance_m);
    histogram!("lap_replay_gap_distance_abs_m", "pair" => pair.to_string())
        .record(gap.distance_m.abs());

    match gap.time_s {
        Some(seconds) => {
            gauge!("lap_replay_gap_time_s", "pair" => pair.to_string()).set(seconds);
        }
        None => {
            counter!("lap_replay_gap_time_undefined_total", "pair" => pair.to_string())
                .increment(1);
        }
    }
}

/// Gap statistics over a playback run
#[derive(Debug, Clone, Default)]
pub struct GapMetricsAggregator {
    /// Frames observed
    pub total_frames: u64,

    /// Frames whose time gap was undefined
    pub undefined_time_frames: u64,

    /// Frames within the side-by-side threshold
    pub side_by_side_frames: u64,

    /// Times the leader of the pair changed
    pub lead_changes: u64,

    /// |distance gap| in metres
    pub distance_stats: RunningStats,

    /// |time gap| in seconds
    pub time_stats: RunningStats,

    last_leader_sign: Option<bool>,
}

impl GapMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one frame's gap
    pub fn update(&mut self, gap: &Gap, side_by_side_m: f64) {
        self.total_frames += 1;
        self.distance_stats.push(gap.distance_m.abs());

        match gap.time_s {
            Some(seconds) => self.time_stats.push(seconds.abs()),
            None => self.undefined_time_frames += 1,
        }

        if gap.distance_m.abs() < side_by_side_m {
            self.side_by_side_frames += 1;
            return;
        }

        let first_ahead = gap.distance_m > 0.0;
        if let Some(previous) = self.last_leader_sign {
            if previous != first_ahead {
                self.lead_changes += 1;
            }
        }
        self.last_leader_sign = Some(first_ahead);
    }

    pub fn summary(&self) -> GapSummary {
        GapSummary {
            total_frames: self.total_frames,
            undefined_time_frames: self.undefined_time_frames,
            side_by_side_rate: if self.total_frames > 0 {
                self.side_by_side_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            lead_changes: self.lead_changes,
            distance_m: StatsSummary::from(&self.distance_stats),
            time_s: StatsSummary::from(&self.time_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// End-of-run gap summary
#[derive(Debug, Clone, Default)]
pub struct GapSummary {
    pub total_frames: u64,
    pub undefined_time_frames: u64,
    pub side_by_side_rate: f64,
    pub lead_changes: u64,
    pub distance_m: StatsSummary,
    pub time_s: StatsSummary,
}

impl std::fmt::Display for GapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Gap Summary ===")?;
        writeln!(f, "Frames: {}", self.total_frames)?;
        writeln!(f, "Side by side: {:.2}%", self.side_by_side_rate)?;
        writeln!(f, "Lead changes: {}", self.lead_changes)?;
        writeln!(f, "Undefined time gaps: {}", self.undefined_time_frames)?;
        writeln!(f, "|Distance gap| (m): {}", self.distance_m)?;
        writeln!(f, "|Time gap| (s): {}", self.time_s)?;
        Ok(())
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(distance_m: f64, time_s: Option<f64>) -> Gap {
        Gap { distance_m, time_s }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_stats_display() {
        let summary = StatsSummary::from(&RunningStats::default());
        assert_eq!(summary.to_string(), "N/A");
    }

    #[test]
    fn test_gap_aggregator_counts() {
        let mut aggregator = GapMetricsAggregator::new();
        aggregator.update(&gap(10.0, Some(0.2)), 1.0);
        aggregator.update(&gap(0.5, Some(0.01)), 1.0);
        aggregator.update(&gap(-4.0, None), 1.0);
        aggregator.update(&gap(-6.0, Some(-0.1)), 1.0);
        aggregator.update(&gap(3.0, Some(0.05)), 1.0);

        let summary = aggregator.summary();
        assert_eq!(summary.total_frames, 5);
        assert_eq!(summary.undefined_time_frames, 1);
        assert_eq!(summary.lead_changes, 2);
        assert!((summary.side_by_side_rate - 20.0).abs() < 1e-10);
        assert_eq!(summary.distance_m.count, 5);
        assert_eq!(summary.time_s.count, 4);
        assert!((summary.distance_m.max - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_gap_summary_display() {
        let mut aggregator = GapMetricsAggregator::new();
        aggregator.update(&gap(2.0, Some(0.04)), 1.0);
        let text = aggregator.summary().to_string();
        assert!(text.contains("Frames: 1"));
        assert!(text.contains("Lead changes: 0"));
    }

    #[test]
    fn test_aggregator_reset() {
        let mut aggregator = GapMetricsAggregator::new();
        aggregator.update(&gap(2.0, None), 1.0);
        aggregator.reset();
        assert_eq!(aggregator.summary().total_frames, 0);
    }

    #[test]
    fn test_recorders_without_installed_recorder() {
        // metrics macros are no-ops without a global recorder
        record_timeline_build(2, 100, 71.2, 0.4);
        record_timeline_failure("no_overlap");
        record_gap("VER-LEC", &gap(1.0, None));
        record_playback_frame(3);
        record_driver_skipped("SAR");
    }
}
