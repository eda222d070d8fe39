//! Session orchestrator - provider, selection, normalization and build.

use std::time::Instant;

use contracts::{
    DriverId, DriverLap, InsufficientDataPolicy, RawLap, SessionBlueprint, SessionDataProvider,
};
use ingestion::{
    normalize_with_report, provider_from_blueprint, select_fastest_laps, select_included_laps,
};
use sync_engine::{common_duration, SyncedDataset, TimelineSynchronizer};
use tracing::{info, instrument, warn};

use super::PipelineStats;
use crate::error::{CliError, Result};

/// Driver excluded before the build
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedDriver {
    pub driver_id: DriverId,
    pub reason: String,
}

/// A built session, ready for readouts or playback
#[derive(Debug)]
pub struct PreparedSession {
    pub label: String,
    pub dataset: SyncedDataset,
    /// Ghost pair for gap readouts
    pub pair: Option<(DriverId, DriverId)>,
    pub skipped: Vec<SkippedDriver>,
    pub stats: PipelineStats,
}

/// Loads and synchronizes one session as described by a blueprint
pub struct SessionPipeline {
    blueprint: SessionBlueprint,
}

impl SessionPipeline {
    pub fn new(blueprint: SessionBlueprint) -> Self {
        Self { blueprint }
    }

    pub fn blueprint(&self) -> &SessionBlueprint {
        &self.blueprint
    }

    /// Run the pipeline against the provider the blueprint names
    pub fn prepare(&self) -> Result<PreparedSession> {
        let provider = provider_from_blueprint(&self.blueprint)?;
        self.prepare_with(provider.as_ref())
    }

    /// Run the pipeline against an explicit provider
    #[instrument(level = "info", name = "prepare_session", skip_all)]
    pub fn prepare_with(&self, provider: &dyn SessionDataProvider) -> Result<PreparedSession> {
        let started = Instant::now();
        let label = provider.session_label();
        let mut stats = PipelineStats::default();

        let selected = self.select(provider.laps()?)?;
        stats.drivers_selected = selected.len();
        info!(session = %label, drivers = selected.len(), "laps selected");

        let (laps, skipped) = self.normalize_all(selected, &mut stats)?;
        if laps.is_empty() {
            return Err(CliError::NothingToSync {
                skipped: skipped.len(),
            });
        }

        let config = self.blueprint.to_timeline_config(common_duration(&laps)?);
        let dataset = TimelineSynchronizer::new(config).build(&laps)?;
        let pair = self.resolve_pair(&dataset)?;

        stats.drivers_tracked = dataset.tracks().len();
        stats.frames = dataset.len();
        stats.prepare_duration = started.elapsed();

        Ok(PreparedSession {
            label,
            dataset,
            pair,
            skipped,
            stats,
        })
    }

    fn select(&self, laps: Vec<RawLap>) -> Result<Vec<RawLap>> {
        let drivers = &self.blueprint.drivers;
        let selected = if drivers.include.is_empty() {
            select_fastest_laps(laps, drivers.count)
        } else {
            select_included_laps(laps, &drivers.include)
        };
        selected.map_err(|err| CliError::Session(err.into()))
    }

    fn normalize_all(
        &self,
        selected: Vec<RawLap>,
        stats: &mut PipelineStats,
    ) -> Result<(Vec<DriverLap>, Vec<SkippedDriver>)> {
        let policy = self.blueprint.drivers.on_insufficient;
        let mut laps = Vec::with_capacity(selected.len());
        let mut skipped = Vec::new();

        for raw in selected {
            let driver_id = raw.driver_id.clone();
            match normalize_with_report(raw) {
                Ok((lap, report)) => {
                    stats.samples_received += report.received;
                    stats.samples_dropped += report.dropped();
                    laps.push(lap);
                }
                Err(err) if err.is_driver_local() && policy == InsufficientDataPolicy::Skip => {
                    warn!(driver_id = %driver_id, error = %err, "driver excluded from timeline");
                    observability::record_driver_skipped(driver_id.as_str());
                    skipped.push(SkippedDriver {
                        driver_id,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok((laps, skipped))
    }

    fn resolve_pair(&self, dataset: &SyncedDataset) -> Result<Option<(DriverId, DriverId)>> {
        match &self.blueprint.gap.pair {
            Some((a, b)) => {
                for driver in [a, b] {
                    if dataset.track(driver).is_none() {
                        return Err(CliError::PairNotTracked {
                            driver_id: driver.to_string(),
                        });
                    }
                }
                Ok(Some((a.clone(), b.clone())))
            }
            None => Ok(dataset
                .default_pair()
                .map(|(a, b)| (a.clone(), b.clone()))),
        }
    }
}
