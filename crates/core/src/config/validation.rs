//! Configuration validation, run once at load time

use super::ConfigSchema;
use crate::detection::CustomFunction;
use crate::error::{Error, Result};
use crate::types::rule::ANY_FILE_TARGET;
use crate::types::{DetectionRule, RulePattern, RuleType};
use regex::Regex;
use std::collections::HashSet;

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InvalidConfig(self.errors))
        }
    }
}

/// Trait for validating configurations
pub trait ConfigValidator {
    fn validate(&self, config: &ConfigSchema) -> ValidationReport;
}

/// Structural and semantic checks over a whole [`ConfigSchema`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ConfigSchema) -> ValidationReport {
        let mut errors = Vec::new();

        for (name, expr) in &config.custom_functions {
            if let Err(e) = expr.parse::<CustomFunction>() {
                errors.push(format!("customFunctions.{name}: {e}"));
            }
        }

        let mut seen_types = HashSet::new();
        for (i, pt) in config.project_types.iter().enumerate() {
            let owner = if pt.id.is_empty() {
                format!("projectTypes[{i}]")
            } else {
                format!("projectType '{}'", pt.id)
            };

            if pt.id.is_empty() {
                errors.push(format!("{owner}: missing id"));
            } else if !seen_types.insert(pt.id.as_str()) {
                errors.push(format!("{owner}: duplicate id"));
            }
            if pt.display_name.is_empty() {
                errors.push(format!("{owner}: missing displayName"));
            }
            if pt.detection_rules.is_empty() {
                errors.push(format!("{owner}: no detection rules"));
            }
            check_rules(&owner, &pt.detection_rules, config, &mut errors);

            for pm in &pt.package_managers {
                let pm_owner = format!("{owner} package manager '{}'", pm.id);
                if pm.id.is_empty() {
                    errors.push(format!("{pm_owner}: missing id"));
                }
                if pm.detection_rules.is_empty() {
                    errors.push(format!("{pm_owner}: no detection rules"));
                }
                check_rules(&pm_owner, &pm.detection_rules, config, &mut errors);
            }
        }

        let mut seen_categories = HashSet::new();
        for (i, category) in config.categories.iter().enumerate() {
            let owner = if category.id.is_empty() {
                format!("categories[{i}]")
            } else {
                format!("category '{}'", category.id)
            };

            if category.id.is_empty() {
                errors.push(format!("{owner}: missing id"));
            } else if !seen_categories.insert(category.id.as_str()) {
                errors.push(format!("{owner}: duplicate id"));
            }
            if category.display_name.is_empty() {
                errors.push(format!("{owner}: missing displayName"));
            }
            if !category.supported_project_types.is_wildcard()
                && category.supported_project_types.ids().is_empty()
            {
                errors.push(format!("{owner}: supportedProjectTypes is empty"));
            }
        }

        for (i, command) in config.commands.iter().enumerate() {
            if command.label.is_empty() || command.command.is_empty() {
                errors.push(format!("commands[{i}]: label and command are required"));
            }
        }

        ValidationReport::from_errors(errors)
    }
}

fn check_rules(
    owner: &str,
    rules: &[DetectionRule],
    config: &ConfigSchema,
    errors: &mut Vec<String>,
) {
    let mut names = HashSet::new();
    for rule in rules {
        let label = format!("{owner} rule '{}'", rule.name);

        if rule.name.is_empty() {
            errors.push(format!("{owner}: rule without a name"));
        } else if !names.insert(rule.name.as_str()) {
            errors.push(format!("{label}: duplicate rule name"));
        }
        if rule.weight == 0 {
            errors.push(format!("{label}: weight must be positive"));
        }
        if rule.target.is_empty() {
            errors.push(format!("{label}: missing target"));
        }

        match rule.rule_type {
            RuleType::FileContent => match rule.pattern() {
                None => errors.push(format!("{label}: file_content rule needs a pattern")),
                Some(RulePattern::Regex { regex }) => {
                    if let Err(e) = Regex::new(regex) {
                        errors.push(format!("{label}: invalid regex: {e}"));
                    }
                }
                Some(RulePattern::Literal(_)) => {}
            },
            RuleType::Custom => {
                let name = rule.custom_function().unwrap_or(rule.target.as_str());
                if rule.custom_function().is_none() && name == ANY_FILE_TARGET {
                    continue;
                }
                if !config.custom_functions.contains_key(name)
                    && name.parse::<CustomFunction>().is_err()
                {
                    errors.push(format!("{label}: unknown custom function '{name}'"));
                }
            }
            RuleType::FileExists | RuleType::DirectoryExists => {}
        }
    }
}

impl ConfigSchema {
    /// Validate with the default [`SchemaValidator`]
    pub fn validate(&self) -> ValidationReport {
        SchemaValidator.validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CategoryDefinition, DetectionRule, ProjectTypeDefinition, SupportedProjectTypes,
    };

    fn config_with(project_type: ProjectTypeDefinition) -> ConfigSchema {
        ConfigSchema {
            project_types: vec![project_type],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = config_with(
            ProjectTypeDefinition::new("elixir", "Elixir")
                .with_rule(DetectionRule::file_exists("mix", "mix.exs").required()),
        );
        assert_eq!(config.validate(), ValidationReport { valid: true, errors: vec![] });
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = config_with(
            ProjectTypeDefinition::new("elixir", "")
                .with_rule(DetectionRule::file_exists("mix", "mix.exs").with_weight(0))
                .with_rule(DetectionRule::file_exists("mix", "mix.lock"))
                .with_rule(DetectionRule::new("content", RuleType::FileContent, "mix.exs"))
                .with_rule(
                    DetectionRule::file_content("bad-regex", "mix.exs", RulePattern::regex("(")),
                )
                .with_rule(DetectionRule::custom("phoenix", "isPhoenix")),
        );
        config.project_types.push(ProjectTypeDefinition::new("elixir", "Elixir again"));
        config.categories.push(CategoryDefinition::new(
            "mix",
            "Mix",
            SupportedProjectTypes::Only(vec![]),
        ));

        let report = config.validate();
        assert!(!report.valid);
        let joined = report.errors.join("\n");
        for needle in [
            "missing displayName",
            "weight must be positive",
            "duplicate rule name",
            "needs a pattern",
            "invalid regex",
            "unknown custom function 'isPhoenix'",
            "duplicate id",
            "no detection rules",
            "supportedProjectTypes is empty",
        ] {
            assert!(joined.contains(needle), "missing '{needle}' in:\n{joined}");
        }
    }

    #[test]
    fn test_custom_rules_resolve_through_aliases() {
        let mut config = config_with(
            ProjectTypeDefinition::new("vue", "Vue")
                .with_rule(DetectionRule::custom("vue-dep", "hasVue"))
                .with_rule(DetectionRule::custom("anything", "*")),
        );
        assert!(!config.validate().valid);

        config
            .custom_functions
            .insert("hasVue".into(), "packageJsonDependency:vue".into());
        assert!(config.validate().valid);
    }

    #[test]
    fn test_into_result() {
        let report = ValidationReport::from_errors(vec!["boom".into()]);
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration:\n  boom");
    }
}
