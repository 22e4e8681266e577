use super::DetectionRule;
use serde::{Deserialize, Serialize};

/// A named technology ecosystem a workspace may belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTypeDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Higher wins when ranking detected types
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub detection_rules: Vec<DetectionRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_managers: Vec<PackageManagerDefinition>,
}

impl ProjectTypeDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            aliases: Vec::new(),
            priority: 0,
            detection_rules: Vec::new(),
            package_managers: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_rule(mut self, rule: DetectionRule) -> Self {
        self.detection_rules.push(rule);
        self
    }

    pub fn with_package_manager(mut self, manager: PackageManagerDefinition) -> Self {
        self.package_managers.push(manager);
        self
    }

    /// Whether `id` names this project type, directly or through an alias
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.aliases.iter().any(|alias| alias == id)
    }

    /// Sum of all rule weights, the denominator of confidence
    pub fn max_possible_score(&self) -> u32 {
        self.detection_rules
            .iter()
            .fold(0u32, |total, rule| total.saturating_add(rule.weight))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManagerDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub detection_rules: Vec<DetectionRule>,
}

impl PackageManagerDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            detection_rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: DetectionRule) -> Self {
        self.detection_rules.push(rule);
        self
    }
}
