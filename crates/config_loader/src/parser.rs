//! Config parsing
//!
//! TOML is the primary format; JSON is accepted for generated configs.

use std::path::Path;

use contracts::{ContractError, SessionBlueprint};

/// Config file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (preferred)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer the format of a config file, rejecting unknown extensions
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse(format!("{} has no file extension", path.display()))
        })?;
        Self::from_extension(ext)
            .ok_or_else(|| ContractError::config_parse(format!("unsupported config format: .{ext}")))
    }
}

/// Parse a TOML config
pub fn parse_toml(content: &str) -> Result<SessionBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a JSON config
pub fn parse_json(content: &str) -> Result<SessionBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a config in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<SessionBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// Render a blueprint in the given format
pub fn render(blueprint: &SessionBlueprint, format: ConfigFormat) -> Result<String, ContractError> {
    let rendered = match format {
        ConfigFormat::Toml => toml::to_string_pretty(blueprint).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(blueprint).map_err(|e| e.to_string()),
    };
    rendered.map_err(|e| ContractError::config_parse(format!("{format:?} serialize error: {e}")))
}
