pub mod category;
pub mod command;
pub mod project_type;
pub mod result;
pub mod rule;

// Re-export commonly used types
pub use category::{CategoryConditions, CategoryDefinition, SupportedProjectTypes};
pub use command::{CommandConditions, CommandDefinition, CommandUpdate, NewCommand, UserCommand};
pub use project_type::{PackageManagerDefinition, ProjectTypeDefinition};
pub use result::{
    DetectedPackageManager, DetectedProjectType, ProjectDetectionResult, ProjectScript,
    ProjectTypeTrace, RuleTrace, UNKNOWN_PROJECT_TYPE,
};
pub use rule::{DetectionRule, RuleConfig, RuleOutcome, RulePattern, RuleType};
