//! Telemetry normalizer.
//!
//! Turns one driver's raw lap into a `DriverLap` whose timestamps are strictly
//! increasing, which is what piecewise-linear interpolation requires.
//!
//! Steps:
//! 1. drop samples carrying a non-finite value
//! 2. stable sort by timestamp
//! 3. keep a sample only if its timestamp is strictly greater than the last
//!    kept one (first occurrence wins)

use contracts::{ContractError, DriverLap, RawLap, RawSample};
use tracing::{debug, instrument, warn};

/// Minimum number of samples interpolation can work with
pub const MIN_SAMPLES: usize = 2;

/// What the normalizer did to one lap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Samples handed in
    pub received: usize,
    /// Samples kept
    pub kept: usize,
    /// Samples dropped for NaN/inf fields
    pub dropped_non_finite: usize,
    /// Samples dropped for repeating an earlier timestamp
    pub dropped_duplicates: usize,
    /// Whether the input arrived out of timestamp order
    pub reordered: bool,
}

impl NormalizeReport {
    /// Total samples discarded
    pub fn dropped(&self) -> usize {
        self.dropped_non_finite + self.dropped_duplicates
    }
}

/// Normalize a raw lap.
///
/// # Errors
/// `ContractError::InsufficientData` when fewer than 2 samples survive.
pub fn normalize(raw: RawLap) -> Result<DriverLap, ContractError> {
    normalize_with_report(raw).map(|(lap, _)| lap)
}

/// Normalize a raw lap and report what was discarded.
#[instrument(
    level = "debug",
    name = "normalize_lap",
    skip(raw),
    fields(driver_id = %raw.driver_id, lap = ?raw.lap_number, samples = raw.samples.len())
)]
pub fn normalize_with_report(raw: RawLap) -> Result<(DriverLap, NormalizeReport), ContractError> {
    let RawLap {
        driver_id,
        lap_number,
        lap_time,
        samples,
    } = raw;

    let mut report = NormalizeReport {
        received: samples.len(),
        ..Default::default()
    };

    let mut samples: Vec<RawSample> = samples.into_iter().filter(is_finite).collect();
    report.dropped_non_finite = report.received - samples.len();

    report.reordered = samples
        .windows(2)
        .any(|pair| pair[1].timestamp < pair[0].timestamp);
    if report.reordered {
        // sort_by is stable, so equal timestamps keep their arrival order
        samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    let mut lap = DriverLap {
        driver_id,
        lap_number,
        lap_time,
        timestamps: Vec::with_capacity(samples.len()),
        x: Vec::with_capacity(samples.len()),
        y: Vec::with_capacity(samples.len()),
        speed: Vec::with_capacity(samples.len()),
        distance: Vec::with_capacity(samples.len()),
    };

    for sample in &samples {
        if let Some(&last) = lap.timestamps.last() {
            if sample.timestamp <= last {
                report.dropped_duplicates += 1;
                continue;
            }
        }
        lap.timestamps.push(sample.timestamp);
        lap.x.push(sample.x);
        lap.y.push(sample.y);
        lap.speed.push(sample.speed);
        lap.distance.push(sample.distance);
    }
    report.kept = lap.len();

    record_report(&lap, &report);

    if report.kept < MIN_SAMPLES {
        warn!(
            driver_id = %lap.driver_id,
            kept = report.kept,
            received = report.received,
            "lap has too few samples to interpolate"
        );
        return Err(ContractError::InsufficientData {
            driver_id: lap.driver_id.to_string(),
            samples: report.kept,
        });
    }

    Ok((lap, report))
}

fn is_finite(sample: &RawSample) -> bool {
    sample.timestamp.is_finite()
        && sample.x.is_finite()
        && sample.y.is_finite()
        && sample.speed.is_finite()
        && sample.distance.is_finite()
}

fn record_report(lap: &DriverLap, report: &NormalizeReport) {
    let driver = lap.driver_id.to_string();
    metrics::counter!("lap_replay_samples_received_total", "driver" => driver.clone())
        .increment(report.received as u64);
    metrics::counter!("lap_replay_samples_kept_total", "driver" => driver.clone())
        .increment(report.kept as u64);
    if report.dropped() > 0 {
        metrics::counter!("lap_replay_samples_dropped_total", "driver" => driver)
            .increment(report.dropped() as u64);
    }

    debug!(
        driver_id = %lap.driver_id,
        kept = report.kept,
        duplicates = report.dropped_duplicates,
        non_finite = report.dropped_non_finite,
        reordered = report.reordered,
        "lap normalized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sample(timestamp: f64, x: f64) -> RawSample {
        RawSample {
            timestamp,
            x,
            y: -x,
            speed: 200.0,
            distance: x * 2.0,
        }
    }

    fn raw(samples: Vec<RawSample>) -> RawLap {
        RawLap {
            driver_id: "VER".into(),
            lap_number: Some(14),
            lap_time: Some(71.365),
            samples,
        }
    }

    #[test]
    fn test_clean_lap_passes_through() {
        let (lap, report) =
            normalize_with_report(raw(vec![sample(0.0, 0.0), sample(1.0, 10.0), sample(2.0, 20.0)]))
                .unwrap();
        assert_eq!(lap.timestamps, vec![0.0, 1.0, 2.0]);
        assert_eq!(lap.x, vec![0.0, 10.0, 20.0]);
        assert_eq!(lap.distance, vec![0.0, 20.0, 40.0]);
        assert_eq!(lap.lap_number, Some(14));
        assert_eq!(report.dropped(), 0);
        assert!(!report.reordered);
    }

    #[test]
    fn test_out_of_order_samples_are_sorted() {
        let (lap, report) =
            normalize_with_report(raw(vec![sample(2.0, 20.0), sample(0.0, 0.0), sample(1.0, 10.0)]))
                .unwrap();
        assert_eq!(lap.timestamps, vec![0.0, 1.0, 2.0]);
        assert_eq!(lap.x, vec![0.0, 10.0, 20.0]);
        assert!(report.reordered);
    }

    #[test]
    fn test_duplicate_timestamp_keeps_first_occurrence() {
        let (lap, report) = normalize_with_report(raw(vec![
            sample(0.0, 0.0),
            sample(1.0, 10.0),
            sample(1.0, 99.0),
            sample(2.0, 20.0),
        ]))
        .unwrap();
        assert_eq!(lap.timestamps, vec![0.0, 1.0, 2.0]);
        assert_eq!(lap.x, vec![0.0, 10.0, 20.0]);
        assert_eq!(report.dropped_duplicates, 1);
    }

    #[test]
    fn test_duplicate_after_reorder_keeps_arrival_order() {
        let lap = normalize(raw(vec![
            sample(1.0, 11.0),
            sample(0.0, 0.0),
            sample(1.0, 12.0),
        ]))
        .unwrap();
        assert_eq!(lap.x, vec![0.0, 11.0]);
    }

    #[test]
    fn test_non_finite_samples_dropped() {
        let mut bad = sample(0.5, 5.0);
        bad.speed = f64::NAN;
        let (lap, report) = normalize_with_report(raw(vec![
            sample(0.0, 0.0),
            bad,
            sample(f64::INFINITY, 1.0),
            sample(1.0, 10.0),
        ]))
        .unwrap();
        assert_eq!(lap.timestamps, vec![0.0, 1.0]);
        assert_eq!(report.dropped_non_finite, 2);
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let err = normalize(raw(vec![sample(3.0, 1.0)])).unwrap_err();
        match err {
            ContractError::InsufficientData { driver_id, samples } => {
                assert_eq!(driver_id, "VER");
                assert_eq!(samples, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_all_duplicates_collapse_to_insufficient() {
        let err = normalize(raw(vec![sample(1.0, 1.0), sample(1.0, 2.0), sample(1.0, 3.0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::InsufficientData { samples: 1, .. }
        ));
    }

    #[test]
    fn test_empty_lap_is_insufficient() {
        let err = normalize(raw(Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InsufficientData { samples: 0, .. }
        ));
    }

    #[test]
    fn test_shuffled_input_is_strictly_increasing() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        for round in 0..20 {
            let mut samples: Vec<RawSample> = (0..200)
                .map(|k| sample((k / 3) as f64 * 0.25, k as f64))
                .collect();
            samples.shuffle(&mut rng);

            let lap = normalize(raw(samples)).unwrap();
            assert!(
                lap.timestamps.windows(2).all(|w| w[0] < w[1]),
                "round {round} not strictly increasing"
            );
            assert_eq!(lap.len(), 67);
            assert_eq!(lap.len(), lap.x.len());
            assert_eq!(lap.len(), lap.distance.len());
        }
    }
}
