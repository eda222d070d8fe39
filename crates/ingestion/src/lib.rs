//! # Ingestion
//!
//! Lap telemetry ingestion.
//!
//! Responsibilities:
//! - Open a session data provider (mock or recorded JSON export)
//! - Select which lap of which driver gets tracked
//! - Back-fill the distance channel when a source lacks it
//! - Normalize raw laps into strictly increasing `DriverLap`s
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{normalize, provider_from_blueprint, select_fastest_laps};
//!
//! let provider = provider_from_blueprint(&blueprint)?;
//! let laps = select_fastest_laps(provider.laps()?, blueprint.drivers.count)?;
//! let clean: Vec<_> = laps.into_iter().filter_map(|lap| normalize(lap).ok()).collect();
//! ```

mod distance;
mod error;
mod file_provider;
mod mock;
mod normalizer;
mod selection;
mod source;

// Re-exports
pub use distance::fill_distance_from_positions;
pub use error::{IngestionError, Result};
pub use file_provider::{ExportLap, ExportSample, JsonSessionProvider, SessionExport};
pub use mock::{MockSessionConfig, MockSessionProvider};
pub use normalizer::{normalize, normalize_with_report, NormalizeReport, MIN_SAMPLES};
pub use selection::{fastest_lap_per_driver, select_fastest_laps, select_included_laps};
pub use source::provider_from_blueprint;
