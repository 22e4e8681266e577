//! The `custom` condition grammar of categories and commands

use super::reports_project_type;
use crate::config::ConfigProvider;
use crate::types::ProjectDetectionResult;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("unknown condition '{0}'")]
    Unknown(String),

    #[error("invalid minConfidence value '{0}'")]
    InvalidConfidence(String),
}

/// `hasProjectType:<id>`, `hasPackageManager:<id>` or `minConfidence:<n>`.
///
/// `hasProjectType` also accepts an alias of the detected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomCondition {
    HasProjectType(String),
    HasPackageManager(String),
    MinConfidence(u32),
}

impl FromStr for CustomCondition {
    type Err = ConditionError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let expr = expr.trim();
        let Some((kind, arg)) = expr.split_once(':') else {
            return Err(ConditionError::Unknown(expr.to_string()));
        };
        let arg = arg.trim();

        match kind {
            "hasProjectType" => Ok(Self::HasProjectType(arg.to_string())),
            "hasPackageManager" => Ok(Self::HasPackageManager(arg.to_string())),
            "minConfidence" => arg
                .parse()
                .map(Self::MinConfidence)
                .map_err(|_| ConditionError::InvalidConfidence(arg.to_string())),
            _ => Err(ConditionError::Unknown(expr.to_string())),
        }
    }
}

impl CustomCondition {
    pub fn holds(&self, result: &ProjectDetectionResult, provider: &dyn ConfigProvider) -> bool {
        match self {
            Self::HasProjectType(id) => reports_project_type(provider, result, id),
            Self::HasPackageManager(id) => result.has_package_manager(id),
            Self::MinConfidence(min) => result
                .detected_project_types
                .iter()
                .any(|pt| pt.confidence >= *min),
        }
    }
}

/// Evaluate a condition string, treating anything unparsable as satisfied
pub fn evaluate_condition(
    expr: &str,
    result: &ProjectDetectionResult,
    provider: &dyn ConfigProvider,
) -> bool {
    match expr.parse::<CustomCondition>() {
        Ok(condition) => condition.holds(result, provider),
        Err(e) => {
            warn!("Treating custom condition as satisfied: {e}");
            true
        }
    }
}
