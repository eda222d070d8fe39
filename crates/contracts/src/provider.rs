//! SessionDataProvider trait - Raw telemetry source abstraction
//!
//! Decouples the synchronizer from wherever lap telemetry comes from
//! (a recorded export, a caching download client, a synthetic generator).
//! Implementations hand over fully materialized laps; fetching and caching
//! are entirely their concern.

use crate::{ContractError, DriverId, RawLap};

/// Source of raw lap telemetry for one session.
///
/// # Example
///
/// ```ignore
/// let provider: Box<dyn SessionDataProvider> = open_provider(&blueprint)?;
/// for lap in provider.laps()? {
///     println!("{} lap {:?}: {} samples", lap.driver_id, lap.lap_number, lap.samples.len());
/// }
/// ```
pub trait SessionDataProvider: Send + Sync {
    /// Human-readable session name (e.g. "2023 Monaco Q")
    fn session_label(&self) -> String;

    /// Every lap of every driver in the session, in any order.
    ///
    /// # Errors
    /// `ContractError::Provider` when the underlying source cannot be read.
    fn laps(&self) -> Result<Vec<RawLap>, ContractError>;

    /// Laps of a single driver.
    ///
    /// # Errors
    /// `ContractError::UnknownDriver` when the driver has no laps at all.
    fn laps_for(&self, driver_id: &DriverId) -> Result<Vec<RawLap>, ContractError> {
        let laps: Vec<RawLap> = self
            .laps()?
            .into_iter()
            .filter(|lap| &lap.driver_id == driver_id)
            .collect();
        if laps.is_empty() {
            return Err(ContractError::UnknownDriver {
                driver_id: driver_id.to_string(),
            });
        }
        Ok(laps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<RawLap>);

    impl SessionDataProvider for Fixed {
        fn session_label(&self) -> String {
            "fixture".into()
        }

        fn laps(&self) -> Result<Vec<RawLap>, ContractError> {
            Ok(self.0.clone())
        }
    }

    fn lap(driver: &str, number: u32) -> RawLap {
        RawLap {
            driver_id: driver.into(),
            lap_number: Some(number),
            lap_time: Some(80.0),
            samples: Vec::new(),
        }
    }

    #[test]
    fn test_laps_for_filters_by_driver() {
        let provider = Fixed(vec![lap("VER", 1), lap("LEC", 1), lap("VER", 2)]);
        let laps = provider.laps_for(&"VER".into()).unwrap();
        assert_eq!(laps.len(), 2);
        assert!(laps.iter().all(|l| l.driver_id == "VER"));
    }

    #[test]
    fn test_laps_for_unknown_driver() {
        let provider = Fixed(vec![lap("VER", 1)]);
        let err = provider.laps_for(&"SAI".into()).unwrap_err();
        assert!(matches!(err, ContractError::UnknownDriver { .. }));
    }
}
