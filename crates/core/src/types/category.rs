use serde::{Deserialize, Serialize};

/// Icon used when a category does not name one
pub const DEFAULT_CATEGORY_ICON: &str = "gear";

/// Which project types a category applies to: `"*"` or a list of ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSupportedTypes", into = "RawSupportedTypes")]
pub enum SupportedProjectTypes {
    All,
    Only(Vec<String>),
}

impl SupportedProjectTypes {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The explicit id list, empty for the wildcard
    pub fn ids(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Only(ids) => ids,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSupportedTypes {
    One(String),
    Many(Vec<String>),
}

impl From<RawSupportedTypes> for SupportedProjectTypes {
    fn from(raw: RawSupportedTypes) -> Self {
        match raw {
            RawSupportedTypes::One(s) if s == "*" => Self::All,
            RawSupportedTypes::One(s) => Self::Only(vec![s]),
            RawSupportedTypes::Many(ids) => Self::Only(ids),
        }
    }
}

impl From<SupportedProjectTypes> for RawSupportedTypes {
    fn from(supported: SupportedProjectTypes) -> Self {
        match supported {
            SupportedProjectTypes::All => Self::One("*".to_string()),
            SupportedProjectTypes::Only(ids) => Self::Many(ids),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConditions {
    #[serde(default)]
    pub requires_git: bool,
    #[serde(default)]
    pub requires_docker: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub supported_project_types: SupportedProjectTypes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<CategoryConditions>,
}

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

impl CategoryDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        supported_project_types: SupportedProjectTypes,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            icon: default_icon(),
            supported_project_types,
            conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: CategoryConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn required_package_manager(&self) -> Option<&str> {
        self.conditions
            .as_ref()
            .and_then(|c| c.required_package_manager.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types_forms() {
        let all: SupportedProjectTypes = serde_json::from_str(r#""*""#).unwrap();
        assert!(all.is_wildcard());

        let one: SupportedProjectTypes = serde_json::from_str(r#""rust""#).unwrap();
        assert_eq!(one, SupportedProjectTypes::Only(vec!["rust".into()]));

        let many: SupportedProjectTypes = serde_json::from_str(r#"["node", "nodejs"]"#).unwrap();
        assert_eq!(many.ids().len(), 2);

        assert_eq!(serde_json::to_string(&all).unwrap(), r#""*""#);
    }

    #[test]
    fn test_category_defaults_icon() {
        let category: CategoryDefinition = serde_json::from_str(
            r#"{"id": "yarn", "displayName": "Yarn", "supportedProjectTypes": ["nodejs"],
                "conditions": {"requiredPackageManager": "yarn"}}"#,
        )
        .unwrap();

        assert_eq!(category.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(category.required_package_manager(), Some("yarn"));
        assert!(!category.conditions.unwrap().requires_git);
    }
}
