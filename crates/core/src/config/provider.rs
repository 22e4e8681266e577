use super::{ConfigSchema, DependencyCheckConfig, DetectionSettings};
use crate::detection::CustomFunction;
use crate::error::Result;
use crate::types::{CategoryDefinition, CommandDefinition, ProjectTypeDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Source of the declarative data the detection engine and filter consume
pub trait ConfigProvider: Send + Sync {
    fn project_types(&self) -> &[ProjectTypeDefinition];

    fn categories(&self) -> &[CategoryDefinition];

    fn commands(&self) -> &[CommandDefinition];

    /// Evaluate the custom predicate registered under `name`.
    ///
    /// Never fails: unknown names and predicate errors are non-matches.
    fn execute_custom_function(&self, name: &str, workspace_root: &Path) -> bool;

    fn detection_settings(&self) -> DetectionSettings {
        DetectionSettings::default()
    }

    fn dependency_check(&self, _category_id: &str) -> Option<&DependencyCheckConfig> {
        None
    }

    /// Look up a project type by id or alias
    fn project_type(&self, id: &str) -> Option<&ProjectTypeDefinition> {
        self.project_types().iter().find(|pt| pt.matches_id(id))
    }

    fn category(&self, id: &str) -> Option<&CategoryDefinition> {
        self.categories().iter().find(|c| c.id == id)
    }
}

/// [`ConfigProvider`] backed by a parsed [`ConfigSchema`]
#[derive(Debug, Clone)]
pub struct SchemaConfigProvider {
    schema: ConfigSchema,
    functions: HashMap<String, CustomFunction>,
}

impl SchemaConfigProvider {
    pub fn new(schema: ConfigSchema) -> Self {
        let mut functions = HashMap::new();
        for (name, expr) in &schema.custom_functions {
            match CustomFunction::from_str(expr) {
                Ok(function) => {
                    debug!("Registered custom function {name} -> {function}");
                    functions.insert(name.clone(), function);
                }
                Err(e) => warn!("Ignoring custom function {name}: {e}"),
            }
        }

        Self { schema, functions }
    }

    /// Provider over the built-in configuration only
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(super::builtin_config()?))
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    fn resolve(&self, name: &str) -> Option<CustomFunction> {
        self.functions
            .get(name)
            .cloned()
            .or_else(|| CustomFunction::from_str(name).ok())
    }
}

impl ConfigProvider for SchemaConfigProvider {
    fn project_types(&self) -> &[ProjectTypeDefinition] {
        &self.schema.project_types
    }

    fn categories(&self) -> &[CategoryDefinition] {
        &self.schema.categories
    }

    fn commands(&self) -> &[CommandDefinition] {
        &self.schema.commands
    }

    fn execute_custom_function(&self, name: &str, workspace_root: &Path) -> bool {
        let Some(function) = self.resolve(name) else {
            warn!("Custom function {name} not found");
            return false;
        };

        match function.evaluate(workspace_root) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Custom function {name} failed: {e}");
                false
            }
        }
    }

    fn detection_settings(&self) -> DetectionSettings {
        self.schema.detection.clone()
    }

    fn dependency_check(&self, category_id: &str) -> Option<&DependencyCheckConfig> {
        self.schema.dependency_detection.get(category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_by_alias() {
        let provider = SchemaConfigProvider::builtin().unwrap();
        assert_eq!(provider.project_type("py").unwrap().id, "python");
        assert!(provider.category("docker").is_some());
        assert!(provider.dependency_check("docker").is_some());
        assert!(provider.dependency_check("rust").is_none());
    }

    #[test]
    fn test_execute_custom_function() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"typescript": "5"}}"#,
        )
        .unwrap();

        let provider = SchemaConfigProvider::builtin().unwrap();
        assert!(provider.execute_custom_function("usesTypeScript", dir.path()));
        assert!(provider.execute_custom_function("hasExtension:json", dir.path()));
        assert!(!provider.execute_custom_function("usesPoetry", dir.path()));
        assert!(!provider.execute_custom_function("doesNotExist", dir.path()));
    }

    #[test]
    fn test_failing_function_is_non_match() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{").unwrap();

        let provider = SchemaConfigProvider::builtin().unwrap();
        assert!(!provider.execute_custom_function("usesTypeScript", dir.path()));
    }
}
