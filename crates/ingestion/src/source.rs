//! Provider construction from a blueprint

use contracts::{ContractError, ProviderKind, SessionBlueprint, SessionDataProvider};
use tracing::info;

use crate::file_provider::JsonSessionProvider;
use crate::mock::{MockSessionConfig, MockSessionProvider};

/// Open the telemetry provider a blueprint asks for.
///
/// `source.path` is used as-is; resolving it against the config file's
/// directory is the config loader's job.
pub fn provider_from_blueprint(
    blueprint: &SessionBlueprint,
) -> Result<Box<dyn SessionDataProvider>, ContractError> {
    let source = &blueprint.source;
    match source.provider {
        ProviderKind::Mock => {
            info!(drivers = source.mock_drivers, "using mock session provider");
            Ok(Box::new(MockSessionProvider::new(MockSessionConfig {
                label: blueprint.session_label(),
                drivers: source.mock_drivers,
                ..Default::default()
            })))
        }
        ProviderKind::File => {
            let path = source
                .path
                .as_ref()
                .ok_or_else(|| ContractError::config_validation("source.path", "path is required when provider = \"file\""))?;
            let provider = JsonSessionProvider::open(path)?;
            Ok(Box::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_uses_blueprint_label() {
        let mut blueprint = SessionBlueprint::default();
        blueprint.source.mock_drivers = 4;
        let provider = provider_from_blueprint(&blueprint).unwrap();
        assert_eq!(provider.session_label(), "2023 Monaco Q");
        assert_eq!(provider.laps().unwrap().len(), 8);
    }

    #[test]
    fn test_file_provider_without_path() {
        let mut blueprint = SessionBlueprint::default();
        blueprint.source.provider = ProviderKind::File;
        let err = provider_from_blueprint(&blueprint).err().unwrap();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_file_provider_missing_file_is_provider_error() {
        let mut blueprint = SessionBlueprint::default();
        blueprint.source.provider = ProviderKind::File;
        blueprint.source.path = Some("/no/such/session.json".into());
        let err = provider_from_blueprint(&blueprint).err().unwrap();
        assert!(matches!(err, ContractError::Provider { .. }));
    }
}
