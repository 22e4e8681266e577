//! Runnable commands derived from a project's own manifests.
//!
//! Each detected project type may have an extractor that reads files such as
//! `package.json`, `Cargo.toml` or a `Makefile` and turns them into
//! [`ProjectScript`]s, using the package manager chosen for that type.

pub mod go;
pub mod node;
pub mod python;
pub mod rust;

use crate::types::{ProjectScript, ProjectTypeDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub use go::GoScriptExtractor;
pub use node::NodeScriptExtractor;
pub use python::PythonScriptExtractor;
pub use rust::RustScriptExtractor;

/// Derives commands for one project type
pub trait ScriptExtractor: Send + Sync {
    /// Id of the project type this extractor serves
    fn project_type(&self) -> &'static str;

    /// Never fails; unreadable manifests yield fewer scripts
    fn extract(&self, root: &Path, package_manager: Option<&str>) -> Vec<ProjectScript>;
}

/// Registry of extractors keyed by project type id
#[derive(Clone)]
pub struct ScriptRegistry {
    extractors: HashMap<String, Arc<dyn ScriptExtractor>>,
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScriptRegistry {
    /// Create a registry with the built-in extractors
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(NodeScriptExtractor));
        registry.register(Arc::new(PythonScriptExtractor));
        registry.register(Arc::new(RustScriptExtractor));
        registry.register(Arc::new(GoScriptExtractor));
        registry
    }

    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    pub fn register(&mut self, extractor: Arc<dyn ScriptExtractor>) {
        self.extractors
            .insert(extractor.project_type().to_string(), extractor);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn ScriptExtractor>> {
        self.extractors.get(id).cloned()
    }

    /// Find the extractor for a project type by its id, then by its aliases
    pub fn extractor_for(
        &self,
        project_type: &ProjectTypeDefinition,
    ) -> Option<Arc<dyn ScriptExtractor>> {
        self.get(&project_type.id).or_else(|| {
            project_type
                .aliases
                .iter()
                .find_map(|alias| self.get(alias))
        })
    }

    pub fn scripts_for(
        &self,
        project_type: &ProjectTypeDefinition,
        root: &Path,
        package_manager: Option<&str>,
    ) -> Vec<ProjectScript> {
        self.extractor_for(project_type)
            .map(|extractor| extractor.extract(root, package_manager))
            .unwrap_or_default()
    }
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}
