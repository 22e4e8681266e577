use super::{DependencyCheckConfig, DetectionSettings};
use crate::error::{Error, Result};
use crate::types::{CategoryDefinition, CommandDefinition, ProjectTypeDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: &str = "1.0.0";

/// The complete, declarative description of what can be detected and run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSchema {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub project_types: Vec<ProjectTypeDefinition>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
    /// Named aliases for custom rule predicates
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_functions: BTreeMap<String, String>,
    #[serde(default)]
    pub detection: DetectionSettings,
    /// Installed-tool probes keyed by category id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependency_detection: BTreeMap<String, DependencyCheckConfig>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self {
            version: default_version(),
            project_types: Vec::new(),
            categories: Vec::new(),
            commands: Vec::new(),
            custom_functions: BTreeMap::new(),
            detection: DetectionSettings::default(),
            dependency_detection: BTreeMap::new(),
        }
    }
}

impl ConfigSchema {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn project_type(&self, id: &str) -> Option<&ProjectTypeDefinition> {
        self.project_types.iter().find(|pt| pt.matches_id(id))
    }

    pub fn category(&self, id: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Walk up from `start_path` looking for a user configuration file
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = super::user_config_path(current);
            if config_path.is_file() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }
}
