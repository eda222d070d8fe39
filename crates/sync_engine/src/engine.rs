//! Timeline synchronizer.

use std::collections::HashSet;
use std::time::Instant;

use contracts::{ContractError, DriverLap, TimelineConfig};
use tracing::{debug, info, instrument, warn};

use crate::dataset::{DriverTrack, SyncedDataset};
use crate::interpolate::resample;
use crate::timeline::SharedTimeline;

/// Shortest lap duration across drivers (`last - first` timestamp).
///
/// # Errors
/// `NoOverlap` when `laps` is empty or any lap has no positive duration.
pub fn common_duration(laps: &[DriverLap]) -> Result<f64, ContractError> {
    if laps.is_empty() {
        return Err(ContractError::no_overlap("no drivers to synchronize"));
    }

    let mut common = f64::INFINITY;
    for lap in laps {
        let duration = lap.duration();
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ContractError::no_overlap(format!(
                "lap of driver '{}' has zero duration",
                lap.driver_id
            )));
        }
        common = common.min(duration);
    }
    Ok(common)
}

/// Aligns normalized driver laps onto one shared, fixed-rate timeline.
///
/// Stateless apart from its config: `build` can be called any number of
/// times and identical inputs give identical datasets.
#[derive(Debug, Clone)]
pub struct TimelineSynchronizer {
    config: TimelineConfig,
}

impl TimelineSynchronizer {
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Build the synchronized dataset. Driver order is preserved.
    ///
    /// All-or-nothing: any error discards the partial work.
    ///
    /// # Errors
    /// - `DuplicateDriver` when a driver appears twice
    /// - `NoOverlap` when there are no laps or a lap has zero duration
    /// - `InvalidFrameCount` when fewer than 2 frames are requested
    #[instrument(
        level = "info",
        name = "timeline_build",
        skip(self, laps),
        fields(drivers = laps.len(), frames = self.config.frame_count)
    )]
    pub fn build(&self, laps: &[DriverLap]) -> Result<SyncedDataset, ContractError> {
        let started = Instant::now();
        let result = self.build_inner(laps);

        match &result {
            Ok(dataset) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                observability::record_timeline_build(
                    dataset.tracks().len(),
                    dataset.len(),
                    dataset.common_duration(),
                    elapsed_ms,
                );
                info!(
                    drivers = dataset.tracks().len(),
                    frames = dataset.len(),
                    common_duration_s = dataset.common_duration(),
                    elapsed_ms,
                    "timeline built"
                );
            }
            Err(err) => {
                observability::record_timeline_failure(failure_kind(err));
                warn!(error = %err, "timeline build failed");
            }
        }
        result
    }

    fn build_inner(&self, laps: &[DriverLap]) -> Result<SyncedDataset, ContractError> {
        check_distinct(laps)?;
        check_aligned(laps)?;
        check_increasing(laps)?;

        let common = common_duration(laps)?;
        let timeline = SharedTimeline::new(common, self.config.frame_count)?;
        debug!(
            common_duration_s = common,
            step_s = timeline.step(),
            "shared timeline constructed"
        );

        let tracks = laps
            .iter()
            .map(|lap| DriverTrack {
                driver_id: lap.driver_id.clone(),
                lap_number: lap.lap_number,
                lap_time: lap.lap_time,
                frames: resample(lap, timeline.times()),
            })
            .collect();

        Ok(SyncedDataset::new(timeline, self.config.speed_unit, tracks))
    }
}

fn check_distinct(laps: &[DriverLap]) -> Result<(), ContractError> {
    let mut seen = HashSet::with_capacity(laps.len());
    for lap in laps {
        if !seen.insert(&lap.driver_id) {
            return Err(ContractError::DuplicateDriver {
                driver_id: lap.driver_id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_aligned(laps: &[DriverLap]) -> Result<(), ContractError> {
    for lap in laps {
        let n = lap.timestamps.len();
        if [lap.x.len(), lap.y.len(), lap.speed.len(), lap.distance.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(ContractError::Other(format!(
                "channels of driver '{}' are not index-aligned",
                lap.driver_id
            )));
        }
    }
    Ok(())
}

/// Interpolation brackets assume a strictly increasing clock
fn check_increasing(laps: &[DriverLap]) -> Result<(), ContractError> {
    for lap in laps {
        if let Some(k) = lap.timestamps.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(ContractError::Other(format!(
                "timestamps of driver '{}' are not strictly increasing at sample {}",
                lap.driver_id,
                k + 1
            )));
        }
    }
    Ok(())
}

fn failure_kind(err: &ContractError) -> &'static str {
    match err {
        ContractError::NoOverlap { .. } => "no_overlap",
        ContractError::InvalidFrameCount { .. } => "invalid_frame_count",
        ContractError::DuplicateDriver { .. } => "duplicate_driver",
        _ => "other",
    }
}
