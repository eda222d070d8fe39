//! Ingestion error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Session export could not be parsed
    #[error("failed to parse session export '{source_name}': {message}")]
    ParseFailed {
        /// File name or other label of the export
        source_name: String,
        /// Error message
        message: String,
    },

    /// Session export could not be read
    #[error("failed to read session export {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some but not all samples of a lap carry a distance
    #[error("lap {lap_number:?} of driver {driver_id} mixes samples with and without distance")]
    InconsistentDistance {
        driver_id: String,
        lap_number: Option<u32>,
    },

    /// No lap in the session has a usable lap time
    #[error("no timed laps found in session data")]
    NoValidLaps,

    /// A requested driver has no timed lap
    #[error("driver {driver_id} has no timed lap")]
    UnknownDriver {
        /// Driver code
        driver_id: String,
    },
}

impl From<IngestionError> for ContractError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::UnknownDriver { driver_id } => ContractError::UnknownDriver { driver_id },
            other => ContractError::provider(other.to_string()),
        }
    }
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
