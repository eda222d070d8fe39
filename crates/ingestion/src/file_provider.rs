//! JSON session export provider
//!
//! Reads a recorded session from a single JSON document:
//!
//! ```json
//! {
//!   "session": "2023 Monaco Q",
//!   "laps": [
//!     {
//!       "driver": "VER",
//!       "lap_number": 14,
//!       "lap_time_s": 71.365,
//!       "samples": [ { "t": 0.0, "x": 1.0, "y": 2.0, "speed": 280.0, "distance": 0.0 } ]
//!     }
//!   ]
//! }
//! ```
//!
//! `distance` is optional per lap: when every sample of a lap omits it the
//! channel is rebuilt from positions.

use std::fs;
use std::path::Path;

use contracts::{ContractError, DriverId, RawLap, RawSample, SessionDataProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::distance::fill_distance_from_positions;
use crate::error::{IngestionError, Result};

/// On-disk session export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Session label
    #[serde(default)]
    pub session: String,

    /// Laps in any order
    #[serde(default)]
    pub laps: Vec<ExportLap>,
}

/// One lap in a session export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportLap {
    #[serde(alias = "driver_id")]
    pub driver: DriverId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_number: Option<u32>,

    #[serde(default, alias = "lap_time", skip_serializing_if = "Option::is_none")]
    pub lap_time_s: Option<f64>,

    #[serde(default)]
    pub samples: Vec<ExportSample>,
}

/// One sample in a session export
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportSample {
    #[serde(alias = "timestamp", alias = "time")]
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl SessionExport {
    /// Build an export from raw laps
    pub fn from_laps(session: impl Into<String>, laps: &[RawLap]) -> Self {
        Self {
            session: session.into(),
            laps: laps
                .iter()
                .map(|lap| ExportLap {
                    driver: lap.driver_id.clone(),
                    lap_number: lap.lap_number,
                    lap_time_s: lap.lap_time,
                    samples: lap
                        .samples
                        .iter()
                        .map(|s| ExportSample {
                            t: s.timestamp,
                            x: s.x,
                            y: s.y,
                            speed: s.speed,
                            distance: Some(s.distance),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Convert to raw laps, back-filling distance where it is absent.
    ///
    /// # Errors
    /// `InconsistentDistance` when a lap mixes samples with and without distance.
    pub fn into_laps(self) -> Result<Vec<RawLap>> {
        self.laps.into_iter().map(ExportLap::into_raw).collect()
    }
}

impl ExportLap {
    fn into_raw(self) -> Result<RawLap> {
        let with_distance = self.samples.iter().filter(|s| s.distance.is_some()).count();
        let backfill = with_distance == 0;
        if !backfill && with_distance != self.samples.len() {
            return Err(IngestionError::InconsistentDistance {
                driver_id: self.driver.to_string(),
                lap_number: self.lap_number,
            });
        }

        let mut samples: Vec<RawSample> = self
            .samples
            .iter()
            .map(|s| RawSample {
                timestamp: s.t,
                x: s.x,
                y: s.y,
                speed: s.speed,
                distance: s.distance.unwrap_or(0.0),
            })
            .collect();
        if backfill {
            fill_distance_from_positions(&mut samples);
        }

        Ok(RawLap {
            driver_id: self.driver,
            lap_number: self.lap_number,
            lap_time: self.lap_time_s,
            samples,
        })
    }
}

/// Provider backed by a JSON session export, loaded eagerly.
#[derive(Debug, Clone)]
pub struct JsonSessionProvider {
    label: String,
    laps: Vec<RawLap>,
}

impl JsonSessionProvider {
    /// Read and parse an export file
    #[instrument(level = "info", name = "open_session_export", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| IngestionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_json(&name, &content)
    }

    /// Parse an export held in memory; `source_name` labels errors
    pub fn from_json(source_name: &str, content: &str) -> Result<Self> {
        let export: SessionExport =
            serde_json::from_str(content).map_err(|e| IngestionError::ParseFailed {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        let label = if export.session.is_empty() {
            source_name.to_string()
        } else {
            export.session.clone()
        };
        let laps = export.into_laps()?;
        info!(session = %label, laps = laps.len(), "session export loaded");
        Ok(Self { label, laps })
    }
}

impl SessionDataProvider for JsonSessionProvider {
    fn session_label(&self) -> String {
        self.label.clone()
    }

    fn laps(&self) -> std::result::Result<Vec<RawLap>, ContractError> {
        Ok(self.laps.clone())
    }
}
