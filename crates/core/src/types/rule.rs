use crate::impl_case_insensitive_deserialize;
use serde::{Deserialize, Serialize};

/// Score a rule contributes when no weight is configured
pub const DEFAULT_RULE_WEIGHT: u32 = 10;

/// Token that makes a `custom` rule fall back to "workspace is non-empty"
pub const ANY_FILE_TARGET: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    FileExists,
    DirectoryExists,
    FileContent,
    Custom,
}

impl_case_insensitive_deserialize!(
    RuleType,
    FileExists => "file_exists",
    DirectoryExists => "directory_exists",
    FileContent => "file_content",
    Custom => "custom"
);

/// Pattern a `file_content` rule looks for.
///
/// A bare string is matched as a literal substring, `{"regex": "..."}` is
/// compiled as a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulePattern {
    Literal(String),
    Regex { regex: String },
}

impl RulePattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn regex(expr: impl Into<String>) -> Self {
        Self::Regex { regex: expr.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<RulePattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_if_exists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_function: Option<String>,
}

/// One atomic, weighted probe against a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRule {
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RuleConfig>,
}

fn default_weight() -> u32 {
    DEFAULT_RULE_WEIGHT
}

impl DetectionRule {
    pub fn new(name: impl Into<String>, rule_type: RuleType, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule_type,
            target: target.into(),
            weight: DEFAULT_RULE_WEIGHT,
            required: false,
            config: None,
        }
    }

    pub fn file_exists(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RuleType::FileExists, target)
    }

    pub fn directory_exists(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RuleType::DirectoryExists, target)
    }

    pub fn file_content(
        name: impl Into<String>,
        target: impl Into<String>,
        pattern: RulePattern,
    ) -> Self {
        Self::new(name, RuleType::FileContent, target).with_pattern(pattern)
    }

    pub fn custom(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RuleType::Custom, target)
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, pattern: RulePattern) -> Self {
        self.config_mut().pattern = Some(pattern);
        self
    }

    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.config_mut().exclude_if_exists.push(path.into());
        self
    }

    pub fn with_custom_function(mut self, name: impl Into<String>) -> Self {
        self.config_mut().custom_function = Some(name.into());
        self
    }

    pub fn pattern(&self) -> Option<&RulePattern> {
        self.config.as_ref().and_then(|c| c.pattern.as_ref())
    }

    pub fn exclusions(&self) -> &[String] {
        self.config
            .as_ref()
            .map(|c| c.exclude_if_exists.as_slice())
            .unwrap_or_default()
    }

    pub fn custom_function(&self) -> Option<&str> {
        self.config.as_ref().and_then(|c| c.custom_function.as_deref())
    }

    fn config_mut(&mut self) -> &mut RuleConfig {
        self.config.get_or_insert_with(RuleConfig::default)
    }
}

/// What a single rule evaluation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub matched: bool,
    /// Either 0 or the rule's full weight
    pub score: u32,
    pub details: Option<String>,
}

impl RuleOutcome {
    pub fn hit(weight: u32, details: impl Into<String>) -> Self {
        Self {
            matched: true,
            score: weight,
            details: Some(details.into()),
        }
    }

    pub fn miss(details: impl Into<String>) -> Self {
        Self {
            matched: false,
            score: 0,
            details: Some(details.into()),
        }
    }
}
