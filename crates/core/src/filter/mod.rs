//! Command and category visibility for a detected project

pub mod condition;

pub use condition::{ConditionError, CustomCondition, evaluate_condition};

use crate::config::ConfigProvider;
use crate::types::category::DEFAULT_CATEGORY_ICON;
use crate::types::{
    CategoryConditions, CategoryDefinition, CommandConditions, CommandDefinition,
    ProjectDetectionResult, SupportedProjectTypes, UserCommand,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Base rank of wildcard categories in suggestions
pub const WILDCARD_CATEGORY_PRIORITY: f64 = 10.0;

/// Contribution of a matching type absent from `detectedProjectTypes`
const UNSCORED_TYPE_PRIORITY: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTypeStats {
    pub total_categories: usize,
    pub supported_categories: usize,
    /// Display names of the hidden categories
    pub unsupported_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDisplayInfo {
    pub display_name: String,
    pub icon: String,
}

/// Decides which categories and commands apply to a detection result
#[derive(Clone)]
pub struct CommandFilter {
    provider: Arc<dyn ConfigProvider>,
}

impl std::fmt::Debug for CommandFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandFilter")
            .field("categories", &self.provider.categories().len())
            .finish()
    }
}

impl CommandFilter {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    /// Whether `category_id` should be shown. Unknown categories are shown.
    pub fn is_category_supported(
        &self,
        category_id: &str,
        result: &ProjectDetectionResult,
    ) -> bool {
        match self.provider.category(category_id) {
            Some(category) => self.category_applies(category, result),
            None => {
                debug!("No definition for category {category_id}, keeping it");
                true
            }
        }
    }

    pub fn filter_categories(
        &self,
        category_ids: &[String],
        result: &ProjectDetectionResult,
    ) -> Vec<String> {
        category_ids
            .iter()
            .filter(|id| self.is_category_supported(id, result))
            .cloned()
            .collect()
    }

    pub fn filter_commands(
        &self,
        commands: &[UserCommand],
        result: &ProjectDetectionResult,
    ) -> Vec<UserCommand> {
        commands
            .iter()
            .filter(|command| self.is_category_supported(&command.category, result))
            .cloned()
            .collect()
    }

    /// Catalog commands whose own conditions hold
    pub fn filter_command_definitions(
        &self,
        commands: &[CommandDefinition],
        result: &ProjectDetectionResult,
    ) -> Vec<CommandDefinition> {
        commands
            .iter()
            .filter(|command| {
                command
                    .conditions
                    .as_ref()
                    .is_none_or(|conditions| command_conditions_hold(conditions, result, self.provider.as_ref()))
            })
            .cloned()
            .collect()
    }

    /// Catalog commands whose category and own conditions both hold
    pub fn visible_catalog_commands(
        &self,
        result: &ProjectDetectionResult,
    ) -> Vec<CommandDefinition> {
        let in_supported_category: Vec<CommandDefinition> = self
            .provider
            .commands()
            .iter()
            .filter(|command| self.is_category_supported(&command.category, result))
            .cloned()
            .collect();
        self.filter_command_definitions(&in_supported_category, result)
    }

    /// Supported category ids, best first.
    ///
    /// Wildcard categories rank at a flat 10; others sum the confidence of
    /// each matching detected type. A required package manager that was
    /// detected adds a tenth of its score. Ties keep configuration order.
    pub fn suggested_categories(&self, result: &ProjectDetectionResult) -> Vec<String> {
        let mut ranked: Vec<(&CategoryDefinition, f64)> = self
            .provider
            .categories()
            .iter()
            .filter(|category| self.category_applies(category, result))
            .map(|category| (category, self.category_priority(category, result)))
            .collect();

        ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        ranked
            .into_iter()
            .map(|(category, _)| category.id.clone())
            .collect()
    }

    pub fn project_type_stats(&self, result: &ProjectDetectionResult) -> ProjectTypeStats {
        let categories = self.provider.categories();
        let unsupported_categories: Vec<String> = categories
            .iter()
            .filter(|category| !self.category_applies(category, result))
            .map(|category| category.display_name.clone())
            .collect();

        ProjectTypeStats {
            total_categories: categories.len(),
            supported_categories: categories.len() - unsupported_categories.len(),
            unsupported_categories,
        }
    }

    /// Display name and icon, synthesized for categories without a definition
    pub fn category_display_info(&self, category_id: &str) -> CategoryDisplayInfo {
        match self.provider.category(category_id) {
            Some(category) => CategoryDisplayInfo {
                display_name: category.display_name.clone(),
                icon: category.icon.clone(),
            },
            None => CategoryDisplayInfo {
                display_name: capitalize(category_id),
                icon: DEFAULT_CATEGORY_ICON.to_string(),
            },
        }
    }

    fn category_applies(
        &self,
        category: &CategoryDefinition,
        result: &ProjectDetectionResult,
    ) -> bool {
        if !self.supports_any_type(&category.supported_project_types, result) {
            return false;
        }
        category
            .conditions
            .as_ref()
            .is_none_or(|conditions| category_conditions_hold(conditions, result, self.provider.as_ref()))
    }

    fn supports_any_type(
        &self,
        supported: &SupportedProjectTypes,
        result: &ProjectDetectionResult,
    ) -> bool {
        match supported {
            SupportedProjectTypes::All => true,
            SupportedProjectTypes::Only(declared) => result.types.iter().any(|reported| {
                declared
                    .iter()
                    .any(|declared| self.same_project_type(declared, reported))
            }),
        }
    }

    fn same_project_type(&self, declared: &str, reported: &str) -> bool {
        same_project_type(self.provider.as_ref(), declared, reported)
    }

    fn category_priority(
        &self,
        category: &CategoryDefinition,
        result: &ProjectDetectionResult,
    ) -> f64 {
        let mut priority = match &category.supported_project_types {
            SupportedProjectTypes::All => WILDCARD_CATEGORY_PRIORITY,
            SupportedProjectTypes::Only(declared) => result
                .types
                .iter()
                .filter(|reported| declared.iter().any(|d| self.same_project_type(d, reported)))
                .map(|reported| {
                    result
                        .project_type(reported)
                        .map_or(UNSCORED_TYPE_PRIORITY, |pt| f64::from(pt.confidence))
                })
                .sum(),
        };

        if let Some(pm) = category
            .required_package_manager()
            .and_then(|id| result.package_manager_entry(id))
        {
            priority += f64::from(pm.score) / 10.0;
        }
        priority
    }
}

/// Ids match directly or through either side's aliases
pub(crate) fn same_project_type(
    provider: &dyn ConfigProvider,
    declared: &str,
    reported: &str,
) -> bool {
    declared == reported
        || provider
            .project_type(declared)
            .is_some_and(|pt| pt.matches_id(reported))
        || provider
            .project_type(reported)
            .is_some_and(|pt| pt.matches_id(declared))
}

/// Whether `result` reports `id` or one of its aliases
pub(crate) fn reports_project_type(
    provider: &dyn ConfigProvider,
    result: &ProjectDetectionResult,
    id: &str,
) -> bool {
    result
        .types
        .iter()
        .any(|reported| same_project_type(provider, id, reported))
}

fn category_conditions_hold(
    conditions: &CategoryConditions,
    result: &ProjectDetectionResult,
    provider: &dyn ConfigProvider,
) -> bool {
    if conditions.requires_git && !result.has_git {
        return false;
    }
    if conditions.requires_docker && !result.has_docker {
        return false;
    }
    if let Some(pm) = &conditions.required_package_manager {
        if !result.has_package_manager(pm) {
            return false;
        }
    }
    conditions
        .custom
        .as_deref()
        .is_none_or(|expr| evaluate_condition(expr, result, provider))
}

fn command_conditions_hold(
    conditions: &CommandConditions,
    result: &ProjectDetectionResult,
    provider: &dyn ConfigProvider,
) -> bool {
    if !conditions.requires_project_type.is_empty()
        && !conditions
            .requires_project_type
            .iter()
            .any(|id| reports_project_type(provider, result, id))
    {
        return false;
    }
    if let Some(pm) = &conditions.requires_package_manager {
        if !result.has_package_manager(pm) {
            return false;
        }
    }
    if conditions.requires_git && !result.has_git {
        return false;
    }
    if conditions.requires_docker && !result.has_docker {
        return false;
    }
    conditions
        .custom
        .as_deref()
        .is_none_or(|expr| evaluate_condition(expr, result, provider))
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSchema, SchemaConfigProvider};
    use crate::types::{DetectedPackageManager, DetectedProjectType, ProjectTypeDefinition};
    use chrono::Utc;

    fn detected(id: &str, confidence: u32) -> DetectedProjectType {
        DetectedProjectType {
            id: id.into(),
            display_name: id.into(),
            score: 80,
            confidence,
            scripts: vec![],
        }
    }

    fn manager(id: &str, project_type: &str, score: u32) -> DetectedPackageManager {
        DetectedPackageManager {
            id: id.into(),
            display_name: id.into(),
            project_type: project_type.into(),
            score,
        }
    }

    fn node_result(manager_id: &str) -> ProjectDetectionResult {
        let mut result = ProjectDetectionResult::empty(None);
        result.types = vec!["nodejs".into()];
        result.detected_project_types = vec![detected("nodejs", 60)];
        result.detected_package_managers = vec![manager(manager_id, "nodejs", 100)];
        result.package_manager = Some(manager_id.into());
        result
    }

    fn builtin_filter() -> CommandFilter {
        CommandFilter::new(Arc::new(SchemaConfigProvider::builtin().unwrap()))
    }

    fn user_command(category: &str) -> UserCommand {
        UserCommand {
            id: 1,
            label: "x".into(),
            command: "x".into(),
            description: None,
            category: category.into(),
            icon: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_required_package_manager_mismatch_hides_category() {
        let filter = builtin_filter();
        let result = node_result("npm");

        assert!(filter.is_category_supported("npm", &result));
        assert!(!filter.is_category_supported("yarn", &result));
        assert!(!filter.is_category_supported("pip", &result));
        assert!(filter.is_category_supported("custom", &result));
        assert!(filter.is_category_supported("not-configured", &result));
    }

    #[test]
    fn test_alias_membership_is_symmetric() {
        let schema = ConfigSchema {
            project_types: vec![ProjectTypeDefinition::new("nodejs", "Node.js").with_alias("node")],
            categories: vec![
                CategoryDefinition::new("by-alias", "By alias", SupportedProjectTypes::Only(vec!["node".into()])),
                CategoryDefinition::new("by-id", "By id", SupportedProjectTypes::Only(vec!["nodejs".into()])),
            ],
            ..Default::default()
        };
        let filter = CommandFilter::new(Arc::new(SchemaConfigProvider::new(schema)));

        let mut reported_as_alias = ProjectDetectionResult::empty(None);
        reported_as_alias.types = vec!["node".into()];
        let reported_as_id = node_result("npm");

        for result in [&reported_as_alias, &reported_as_id] {
            assert!(filter.is_category_supported("by-alias", result));
            assert!(filter.is_category_supported("by-id", result));
        }
    }

    #[test]
    fn test_structural_conditions_are_anded() {
        let filter = builtin_filter();
        let mut result = ProjectDetectionResult::empty(None);
        result.types = vec!["git".into()];

        assert!(!filter.is_category_supported("git", &result));
        result.has_git = true;
        assert!(filter.is_category_supported("git", &result));
    }

    #[test]
    fn test_wildcard_supports_any_result() {
        let filter = builtin_filter();
        assert!(filter.is_category_supported("custom", &ProjectDetectionResult::empty(None)));
    }

    #[test]
    fn test_filter_commands_and_categories() {
        let filter = builtin_filter();
        let result = node_result("pnpm");

        let commands = vec![user_command("pnpm"), user_command("rust"), user_command("custom")];
        let visible: Vec<_> = filter
            .filter_commands(&commands, &result)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(visible, vec!["pnpm", "custom"]);

        let ids: Vec<String> = ["npm", "pnpm", "docker"].iter().map(|s| s.to_string()).collect();
        assert_eq!(filter.filter_categories(&ids, &result), vec!["pnpm"]);
    }

    #[test]
    fn test_suggested_categories_ranking() {
        let filter = builtin_filter();
        let mut result = node_result("pnpm");
        result.types.push("git".into());
        result.has_git = true;
        result.detected_project_types.push(detected("git", 86));

        // pnpm: 60 + 100/10, git: 86, custom: 10
        assert_eq!(filter.suggested_categories(&result), vec!["git", "pnpm", "custom"]);
    }

    #[test]
    fn test_command_definition_conditions() {
        let filter = builtin_filter();
        let mut result = ProjectDetectionResult::empty(None);
        result.types = vec!["java".into()];
        result.detected_package_managers = vec![manager("gradle", "java", 100)];

        let visible: Vec<_> = filter
            .visible_catalog_commands(&result)
            .into_iter()
            .filter(|c| c.category == "java")
            .map(|c| c.label)
            .collect();
        assert_eq!(visible, vec!["Gradle build"]);
    }

    #[test]
    fn test_stats_and_display_info() {
        let filter = builtin_filter();
        let stats = filter.project_type_stats(&node_result("npm"));
        assert_eq!(stats.supported_categories, 2);
        assert_eq!(stats.total_categories, stats.supported_categories + stats.unsupported_categories.len());
        assert!(stats.unsupported_categories.contains(&"Yarn".to_string()));

        assert_eq!(filter.category_display_info("git").icon, "git-branch");
        let synthesized = filter.category_display_info("terraform");
        assert_eq!(synthesized.display_name, "Terraform");
        assert_eq!(synthesized.icon, DEFAULT_CATEGORY_ICON);
    }
}
