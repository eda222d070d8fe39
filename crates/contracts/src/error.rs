//! Layered error definitions
//!
//! Categorized by source: config / provider / sync

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Provider Errors =====
    /// Session data provider failed to deliver laps
    #[error("session data provider error: {message}")]
    Provider { message: String },

    /// A requested driver has no data in the session
    #[error("unknown driver: {driver_id}")]
    UnknownDriver { driver_id: String },

    // ===== Sync Errors =====
    /// A cleaned lap has too few samples to interpolate
    #[error("insufficient data for driver '{driver_id}': {samples} sample(s) after cleaning, need at least 2")]
    InsufficientData { driver_id: String, samples: usize },

    /// No positive duration is shared by every tracked driver
    #[error("no common duration across drivers: {reason}")]
    NoOverlap { reason: String },

    /// Requested frame count cannot produce an animation
    #[error("invalid frame count {requested}: between 2 and {} frames are supported", crate::MAX_FRAMES)]
    InvalidFrameCount { requested: usize },

    /// The same driver was handed to the synchronizer twice
    #[error("driver '{driver_id}' appears more than once")]
    DuplicateDriver { driver_id: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create no-overlap error
    pub fn no_overlap(reason: impl Into<String>) -> Self {
        Self::NoOverlap {
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns a single driver, so the session can
    /// still be built without that driver.
    pub fn is_driver_local(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::UnknownDriver { .. }
        )
    }
}
