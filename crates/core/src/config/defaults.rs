//! The built-in configuration shipped with the binary

use super::ConfigSchema;
use crate::error::Result;

/// Raw JSON of the built-in configuration
pub const BUILTIN_CONFIG_JSON: &str = include_str!("../../config/default.json");

/// Parse the built-in configuration
pub fn builtin_config() -> Result<ConfigSchema> {
    ConfigSchema::from_json(BUILTIN_CONFIG_JSON)
}

/// Configuration used when even the built-in document cannot be loaded.
///
/// It knows a single generic project type that matches any non-empty
/// workspace, so users still get the catch-all category.
pub fn fallback_config() -> ConfigSchema {
    use crate::types::{
        CategoryDefinition, DetectionRule, ProjectTypeDefinition, SupportedProjectTypes,
    };
    use crate::types::rule::ANY_FILE_TARGET;

    ConfigSchema {
        project_types: vec![
            ProjectTypeDefinition::new("generic", "Generic Project")
                .with_rule(DetectionRule::custom("any-file", ANY_FILE_TARGET).with_weight(50)),
        ],
        categories: vec![CategoryDefinition::new(
            "custom",
            "Custom",
            SupportedProjectTypes::All,
        )],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_parses_and_validates() {
        let config = builtin_config().unwrap();
        let report = config.validate();
        assert!(report.valid, "{:?}", report.errors);

        for id in ["nodejs", "python", "rust", "go", "java", "docker", "git"] {
            assert!(config.project_type(id).is_some(), "missing {id}");
        }
        assert_eq!(config.project_type("node").map(|pt| pt.id.as_str()), Some("nodejs"));
        assert!(config.category("custom").unwrap().supported_project_types.is_wildcard());
    }

    #[test]
    fn test_fallback_config_is_valid() {
        let report = fallback_config().validate();
        assert!(report.valid, "{:?}", report.errors);
    }
}
