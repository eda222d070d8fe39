//! Command implementations.

mod info;
mod play;
mod sync;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::SessionBlueprint;

use crate::error::CliError;

pub use info::run_info;
pub use play::run_play;
pub use sync::run_sync;
pub use validate::run_validate;

/// Load and validate a blueprint, failing early when the file is missing
fn load_blueprint(path: &Path) -> Result<SessionBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
