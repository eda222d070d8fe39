//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ProviderKind, SessionBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    session: String,
    provider: String,
    driver_count: usize,
    included_drivers: usize,
    fps: u32,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    session: blueprint.session_label(),
                    provider: format!("{:?}", blueprint.source.provider),
                    driver_count: blueprint.drivers.count,
                    included_drivers: blueprint.drivers.include.len(),
                    fps: blueprint.playback.fps,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &SessionBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let source = &blueprint.source;
    let drivers = &blueprint.drivers;

    if source.provider == ProviderKind::Mock {
        warnings.push("source.provider is \"mock\" - telemetry is synthetic".to_string());
        if drivers.include.is_empty() && drivers.count > source.mock_drivers {
            warnings.push(format!(
                "drivers.count = {} but the mock session only has {} drivers",
                drivers.count, source.mock_drivers
            ));
        }
    }

    if source.provider == ProviderKind::File {
        if let Some(ref path) = source.path {
            if !path.exists() {
                warnings.push(format!("Session export not found: {}", path.display()));
            }
        }
    }

    if !drivers.include.is_empty() && drivers.count != drivers.include.len() {
        warnings.push("drivers.include is set - drivers.count is ignored".to_string());
    }

    if drivers.include.len() == 1 || drivers.count == 1 {
        warnings.push("Only one driver tracked - gap readouts are disabled".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Session: {}", summary.session);
            println!("  Provider: {}", summary.provider);
            println!("  Drivers: {}", summary.driver_count);
            if summary.included_drivers > 0 {
                println!("  Included drivers: {}", summary.included_drivers);
            }
            println!("  FPS: {}", summary.fps);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(path: PathBuf) -> ValidateArgs {
        ValidateArgs {
            config: path,
            json: true,
        }
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let file = write_config("[source]\nmock_drivers = 4\n[drivers]\ncount = 6\n");
        let result = validate_config(&args(file.path().to_path_buf()));
        assert!(result.valid);
        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("only has 4 drivers")));
    }

    #[test]
    fn test_invalid_config() {
        let file = write_config("[playback]\nfps = 0\n");
        let result = validate_config(&args(file.path().to_path_buf()));
        assert!(!result.valid);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_missing_file() {
        let result = validate_config(&args(PathBuf::from("/no/such/session.toml")));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_run_validate_fails_on_invalid() {
        let file = write_config("[gap]\npair = [\"VER\", \"VER\"]\n");
        assert!(run_validate(&args(file.path().to_path_buf())).is_err());
    }
}
