//! Immutable synchronized dataset.
//!
//! Every tracked driver has exactly `len()` frames and index `i` means the
//! same grid instant for all of them. Nothing here mutates after
//! construction, so a dataset can be shared across threads behind an `Arc`
//! and read without locking.

use std::collections::HashMap;

use contracts::{DriverId, Gap, SpeedUnit, SyncedFrame};
use serde::Serialize;

use crate::readout::{GapReadout, LapRank, SpeedLeader, Standing};
use crate::timeline::SharedTimeline;

/// Resampled channels of one driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverTrack {
    pub driver_id: DriverId,
    pub lap_number: Option<u32>,
    pub lap_time: Option<f64>,
    pub frames: Vec<SyncedFrame>,
}

/// Output of the timeline synchronizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncedDataset {
    timeline: SharedTimeline,
    speed_unit: SpeedUnit,
    tracks: Vec<DriverTrack>,
    #[serde(skip)]
    index: HashMap<DriverId, usize>,
}

impl SyncedDataset {
    pub(crate) fn new(
        timeline: SharedTimeline,
        speed_unit: SpeedUnit,
        tracks: Vec<DriverTrack>,
    ) -> Self {
        let index = tracks
            .iter()
            .enumerate()
            .map(|(i, track)| (track.driver_id.clone(), i))
            .collect();
        Self {
            timeline,
            speed_unit,
            tracks,
            index,
        }
    }

    /// Frames per driver
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    pub fn timeline(&self) -> &SharedTimeline {
        &self.timeline
    }

    pub fn common_duration(&self) -> f64 {
        self.timeline.common_duration()
    }

    pub fn speed_unit(&self) -> SpeedUnit {
        self.speed_unit
    }

    /// Tracked drivers in build order
    pub fn driver_ids(&self) -> impl Iterator<Item = &DriverId> + '_ {
        self.tracks.iter().map(|track| &track.driver_id)
    }

    pub fn tracks(&self) -> &[DriverTrack] {
        &self.tracks
    }

    pub fn track(&self, driver_id: &DriverId) -> Option<&DriverTrack> {
        self.index.get(driver_id).map(|&i| &self.tracks[i])
    }

    /// Driver state at grid index `i`; `None` for an unknown driver or out-of-range index.
    #[inline]
    pub fn frame(&self, driver_id: &DriverId, i: usize) -> Option<&SyncedFrame> {
        self.track(driver_id)?.frames.get(i)
    }

    /// Grid time at index `i`
    pub fn time_at(&self, i: usize) -> Option<f64> {
        self.timeline.time_at(i)
    }

    /// Separation of `a` relative to `b` at index `i`.
    ///
    /// Positive `distance_m` means `a` is ahead. `time_s` divides by the mean
    /// of both speeds in m/s and is `None` when that mean is not positive.
    pub fn gap(&self, a: &DriverId, b: &DriverId, i: usize) -> Option<Gap> {
        let fa = self.frame(a, i)?;
        let fb = self.frame(b, i)?;

        let distance_m = fa.distance - fb.distance;
        let mean_mps =
            (self.speed_unit.to_mps(fa.speed) + self.speed_unit.to_mps(fb.speed)) / 2.0;
        let time_s = (mean_mps.is_finite() && mean_mps > 0.0).then(|| distance_m / mean_mps);

        Some(Gap { distance_m, time_s })
    }

    /// Gap phrased for display
    pub fn gap_readout(
        &self,
        a: &DriverId,
        b: &DriverId,
        i: usize,
        side_by_side_m: f64,
    ) -> Option<GapReadout> {
        let gap = self.gap(a, b, i)?;
        Some(GapReadout::from_gap(a, b, gap, side_by_side_m))
    }

    /// Highest interpolated speed at index `i`; earlier drivers win ties.
    pub fn max_speed_at(&self, i: usize) -> Option<SpeedLeader> {
        let mut best: Option<(&DriverId, f64)> = None;
        for track in &self.tracks {
            let speed = track.frames.get(i)?.speed;
            if best.map_or(true, |(_, s)| speed > s) {
                best = Some((&track.driver_id, speed));
            }
        }
        best.map(|(driver_id, speed)| SpeedLeader {
            driver_id: driver_id.clone(),
            speed,
        })
    }

    /// Running order by distance covered at index `i`; ties keep build order.
    pub fn standings_at(&self, i: usize) -> Vec<Standing> {
        if i >= self.len() {
            return Vec::new();
        }
        let mut order: Vec<(&DriverId, f64)> = self
            .tracks
            .iter()
            .map(|track| (&track.driver_id, track.frames[i].distance))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let leader = order.first().map_or(0.0, |(_, d)| *d);
        order
            .into_iter()
            .enumerate()
            .map(|(pos, (driver_id, distance_m))| Standing {
                position: pos + 1,
                driver_id: driver_id.clone(),
                distance_m,
                behind_leader_m: leader - distance_m,
            })
            .collect()
    }

    /// Tracked drivers with a lap time, quickest first
    pub fn lap_ranking(&self) -> Vec<LapRank> {
        let mut timed: Vec<&DriverTrack> = self
            .tracks
            .iter()
            .filter(|track| track.lap_time.is_some_and(f64::is_finite))
            .collect();
        timed.sort_by(|a, b| {
            let (ta, tb) = (a.lap_time.unwrap_or(f64::INFINITY), b.lap_time.unwrap_or(f64::INFINITY));
            ta.total_cmp(&tb)
        });
        timed
            .into_iter()
            .enumerate()
            .map(|(pos, track)| LapRank {
                position: pos + 1,
                driver_id: track.driver_id.clone(),
                lap_number: track.lap_number,
                lap_time_s: track.lap_time.unwrap_or(f64::INFINITY),
            })
            .collect()
    }

    /// Resampled path of the first tracked driver, used as the static track outline
    pub fn track_outline(&self) -> Vec<(f64, f64)> {
        self.tracks
            .first()
            .map(|track| track.frames.iter().map(|f| (f.x, f.y)).collect())
            .unwrap_or_default()
    }

    /// The two leading drivers in build order, the default ghost pair
    pub fn default_pair(&self) -> Option<(&DriverId, &DriverId)> {
        match self.tracks.as_slice() {
            [a, b, ..] => Some((&a.driver_id, &b.driver_id)),
            _ => None,
        }
    }
}
