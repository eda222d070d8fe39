//! Config validation
//!
//! Rules:
//! - field ranges (fps, driver count, durations) via `validator` derives
//! - `file` provider has a path
//! - included driver codes are well formed and unique
//! - ghost pair names two distinct drivers, both tracked when `include` is set

use std::collections::HashSet;

use contracts::{ContractError, ProviderKind, SessionBlueprint};
use ::validator::Validate;

/// Validate a SessionBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    validate_ranges(blueprint)?;
    validate_source(blueprint)?;
    validate_included_drivers(blueprint)?;
    validate_gap_pair(blueprint)?;
    Ok(())
}

/// Field-level ranges declared on the contract types
fn validate_ranges(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(|errors| {
        let mut fields: Vec<&str> = errors.errors().keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        ContractError::config_validation(fields.join(", "), errors.to_string())
    })
}

/// A file provider needs somewhere to read from
fn validate_source(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let source = &blueprint.source;
    if source.provider == ProviderKind::File {
        match &source.path {
            None => {
                return Err(ContractError::config_validation(
                    "source.path",
                    "path is required when provider = \"file\"",
                ))
            }
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ContractError::config_validation(
                    "source.path",
                    "path cannot be empty",
                ))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Included driver codes must be well formed and unique
fn validate_included_drivers(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for driver in &blueprint.drivers.include {
        if !driver.is_well_formed() {
            return Err(ContractError::config_validation(
                "drivers.include",
                format!("malformed driver code '{driver}'"),
            ));
        }
        if !seen.insert(driver) {
            return Err(ContractError::config_validation(
                format!("drivers.include[{driver}]"),
                "duplicate driver code",
            ));
        }
    }
    Ok(())
}

/// The ghost pair must be two distinct, tracked drivers
fn validate_gap_pair(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let Some((a, b)) = &blueprint.gap.pair else {
        return Ok(());
    };

    if a == b {
        return Err(ContractError::config_validation(
            "gap.pair",
            format!("pair must name two different drivers, got '{a}' twice"),
        ));
    }

    let include = &blueprint.drivers.include;
    if !include.is_empty() {
        for driver in [a, b] {
            if !include.contains(driver) {
                return Err(ContractError::config_validation(
                    "gap.pair",
                    format!("driver '{driver}' is not in drivers.include"),
                ));
            }
        }
    }

    Ok(())
}
