//! # Config Loader
//!
//! Turns a `session.toml` (or `.json`) into a validated [`SessionBlueprint`].
//!
//! Loading is parse, then validate, then path resolution: a relative
//! `source.path` points next to the config file, not the working directory.
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("session.toml")).unwrap();
//! println!("Session: {}", blueprint.session_label());
//! ```

mod parser;
mod validator;

use std::path::Path;

use contracts::ContractError;

pub use contracts::SessionBlueprint;
pub use parser::ConfigFormat;

/// Entry points for reading and writing session configs
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a config file; the format follows the extension.
    ///
    /// # Errors
    /// `ConfigParse` for unreadable, unknown-format or malformed files,
    /// `ConfigValidation` when a rule is broken.
    pub fn load_from_path(path: &Path) -> Result<SessionBlueprint, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        let mut blueprint = Self::load_from_str(&content, format)?;
        if let Some(base) = path.parent() {
            resolve_source_path(&mut blueprint, base);
        }
        Ok(blueprint)
    }

    /// Parse and validate config text
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Re-check a blueprint that was modified after loading
    pub fn validate(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    pub fn to_toml(blueprint: &SessionBlueprint) -> Result<String, ContractError> {
        parser::render(blueprint, ConfigFormat::Toml)
    }

    pub fn to_json(blueprint: &SessionBlueprint) -> Result<String, ContractError> {
        parser::render(blueprint, ConfigFormat::Json)
    }
}

fn resolve_source_path(blueprint: &mut SessionBlueprint, base: &Path) {
    if let Some(source) = blueprint.source.path.as_mut() {
        if source.is_relative() {
            *source = base.join(&*source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MINIMAL_TOML: &str = r#"
[session]
year = 2023
event = "Monaco"
kind = "Q"

[drivers]
count = 4

[playback]
fps = 30
"#;

    #[test]
    fn test_load_from_str_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.session.event, "Monaco");
        assert_eq!(bp.drivers.count, 4);
    }

    #[test]
    fn test_toml_and_json_agree() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();

        let from_toml =
            ConfigLoader::load_from_str(&ConfigLoader::to_toml(&bp).unwrap(), ConfigFormat::Toml)
                .unwrap();
        let from_json =
            ConfigLoader::load_from_str(&ConfigLoader::to_json(&bp).unwrap(), ConfigFormat::Json)
                .unwrap();

        assert_eq!(from_toml.session_label(), from_json.session_label());
        assert_eq!(from_toml.playback.fps, 30);
        assert_eq!(from_json.drivers.count, 4);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[drivers]
include = ["VER", "VER"]
"#;
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_huge_duration_fails_validation() {
        let err = ConfigLoader::load_from_str("[playback]\nduration_s = 1e300\n", ConfigFormat::Toml)
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("session.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let err = ConfigLoader::load_from_path(Path::new("/no/such/session.toml")).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_relative_source_path_is_resolved() {
        let mut bp = SessionBlueprint::default();
        bp.source.path = Some(PathBuf::from("data/monaco.json"));
        resolve_source_path(&mut bp, Path::new("/srv/replay"));
        assert_eq!(
            bp.source.path,
            Some(PathBuf::from("/srv/replay/data/monaco.json"))
        );

        bp.source.path = Some(PathBuf::from("/abs/monaco.json"));
        resolve_source_path(&mut bp, Path::new("/srv/replay"));
        assert_eq!(bp.source.path, Some(PathBuf::from("/abs/monaco.json")));
    }
}
