//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Ghost pair names a driver that did not make it onto the timeline
    #[error("Gap pair driver '{driver_id}' is not on the timeline")]
    PairNotTracked { driver_id: String },

    /// Every selected driver was excluded before the build
    #[error("No driver left to synchronize ({skipped} skipped for insufficient data)")]
    NothingToSync { skipped: usize },

    /// Session loading or synchronization error
    #[error(transparent)]
    Session(#[from] ContractError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
