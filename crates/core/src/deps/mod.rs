//! Presence checks for the external tools behind categories

pub mod checker;

pub use checker::{
    DEFAULT_BATCH_DEADLINE, DEFAULT_CHECK_TIMEOUT, DependencyChecker, FAILURE_TTL, SUCCESS_TTL,
};

use crate::config::ConfigSchema;

impl DependencyChecker {
    /// Checker over the `dependencyDetection` section of a schema
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        Self::new(schema.dependency_detection.clone())
    }
}
