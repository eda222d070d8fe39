//! Lap selection: which lap of which driver gets tracked.
//!
//! Only laps with a usable lap time are candidates, so in/out laps and
//! deleted laps never make it onto the timeline.

use std::collections::HashMap;

use contracts::{DriverId, RawLap};
use tracing::debug;

use crate::error::{IngestionError, Result};

/// Fastest timed lap of every driver, sorted by lap time (quickest first).
///
/// Ties between two laps of the same driver go to the lower lap number;
/// ties between drivers keep first-seen order.
pub fn fastest_lap_per_driver(laps: Vec<RawLap>) -> Vec<RawLap> {
    let mut order: Vec<DriverId> = Vec::new();
    let mut best: HashMap<DriverId, RawLap> = HashMap::new();

    for lap in laps {
        let Some(time) = usable_lap_time(&lap) else {
            continue;
        };
        match best.get(&lap.driver_id) {
            Some(current) if !is_faster(time, lap.lap_number, current) => {}
            Some(_) => {
                best.insert(lap.driver_id.clone(), lap);
            }
            None => {
                order.push(lap.driver_id.clone());
                best.insert(lap.driver_id.clone(), lap);
            }
        }
    }

    let mut ranked: Vec<RawLap> = order
        .into_iter()
        .filter_map(|driver| best.remove(&driver))
        .collect();
    ranked.sort_by(|a, b| lap_time_key(a).total_cmp(&lap_time_key(b)));
    ranked
}

/// The `count` fastest drivers' fastest laps.
///
/// # Errors
/// `NoValidLaps` when no lap in the session is timed.
pub fn select_fastest_laps(laps: Vec<RawLap>, count: usize) -> Result<Vec<RawLap>> {
    let mut ranked = fastest_lap_per_driver(laps);
    if ranked.is_empty() {
        return Err(IngestionError::NoValidLaps);
    }
    ranked.truncate(count);
    debug!(
        selected = ranked.len(),
        requested = count,
        "fastest laps selected"
    );
    Ok(ranked)
}

/// Fastest lap of each listed driver, in the listed order.
///
/// # Errors
/// `UnknownDriver` when a listed driver has no timed lap.
pub fn select_included_laps(laps: Vec<RawLap>, include: &[DriverId]) -> Result<Vec<RawLap>> {
    let mut by_driver: HashMap<DriverId, RawLap> = fastest_lap_per_driver(laps)
        .into_iter()
        .map(|lap| (lap.driver_id.clone(), lap))
        .collect();

    include
        .iter()
        .map(|driver| {
            by_driver
                .remove(driver)
                .ok_or_else(|| IngestionError::UnknownDriver {
                    driver_id: driver.to_string(),
                })
        })
        .collect()
}

fn usable_lap_time(lap: &RawLap) -> Option<f64> {
    lap.lap_time.filter(|t| t.is_finite() && *t > 0.0)
}

fn is_faster(time: f64, lap_number: Option<u32>, current: &RawLap) -> bool {
    let current_time = lap_time_key(current);
    time < current_time
        || (time == current_time
            && lap_number.unwrap_or(u32::MAX) < current.lap_number.unwrap_or(u32::MAX))
}

fn lap_time_key(lap: &RawLap) -> f64 {
    usable_lap_time(lap).unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(driver: &str, number: u32, time: Option<f64>) -> RawLap {
        RawLap {
            driver_id: driver.into(),
            lap_number: Some(number),
            lap_time: time,
            samples: Vec::new(),
        }
    }

    fn drivers(laps: &[RawLap]) -> Vec<&str> {
        laps.iter().map(|l| l.driver_id.as_str()).collect()
    }

    #[test]
    fn test_fastest_lap_per_driver_ranks_by_time() {
        let laps = vec![
            lap("LEC", 1, Some(72.1)),
            lap("VER", 1, Some(71.9)),
            lap("LEC", 2, Some(71.5)),
            lap("ALO", 3, Some(71.7)),
            lap("VER", 2, None),
        ];
        let ranked = fastest_lap_per_driver(laps);
        assert_eq!(drivers(&ranked), vec!["LEC", "ALO", "VER"]);
        assert_eq!(ranked[0].lap_number, Some(2));
    }

    #[test]
    fn test_untimed_and_invalid_laps_ignored() {
        let laps = vec![
            lap("HAM", 1, None),
            lap("HAM", 2, Some(f64::NAN)),
            lap("HAM", 3, Some(0.0)),
            lap("RUS", 4, Some(73.0)),
        ];
        assert_eq!(drivers(&fastest_lap_per_driver(laps)), vec!["RUS"]);
    }

    #[test]
    fn test_equal_times_prefer_lower_lap_number() {
        let laps = vec![lap("NOR", 7, Some(72.0)), lap("NOR", 3, Some(72.0))];
        let ranked = fastest_lap_per_driver(laps);
        assert_eq!(ranked[0].lap_number, Some(3));
    }

    #[test]
    fn test_select_fastest_truncates() {
        let laps = vec![
            lap("A", 1, Some(75.0)),
            lap("B", 1, Some(74.0)),
            lap("C", 1, Some(73.0)),
        ];
        let selected = select_fastest_laps(laps, 2).unwrap();
        assert_eq!(drivers(&selected), vec!["C", "B"]);
    }

    #[test]
    fn test_select_fastest_without_timed_laps() {
        let err = select_fastest_laps(vec![lap("A", 1, None)], 5).unwrap_err();
        assert!(matches!(err, IngestionError::NoValidLaps));
    }

    #[test]
    fn test_select_included_keeps_listed_order() {
        let laps = vec![
            lap("VER", 1, Some(71.0)),
            lap("PER", 1, Some(72.0)),
            lap("SAI", 1, Some(71.5)),
        ];
        let include: Vec<DriverId> = vec!["PER".into(), "VER".into()];
        let selected = select_included_laps(laps, &include).unwrap();
        assert_eq!(drivers(&selected), vec!["PER", "VER"]);
    }

    #[test]
    fn test_select_included_unknown_driver() {
        let laps = vec![lap("VER", 1, Some(71.0))];
        let include: Vec<DriverId> = vec!["BOT".into()];
        let err = select_included_laps(laps, &include).unwrap_err();
        assert!(matches!(err, IngestionError::UnknownDriver { ref driver_id } if driver_id == "BOT"));
    }
}
