use super::{ConfigMerger, ConfigSchema, builtin_config, fallback_config};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const USER_CONFIG_DIR: &str = ".depcmd";
pub const USER_CONFIG_FILE: &str = "config.json";

/// Environment variable naming an extra configuration layer
pub const CONFIG_ENV_VAR: &str = "DEPCMD_CONFIG";

/// `<root>/.depcmd/config.json`
pub fn user_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE)
}

/// Builds the effective configuration for a workspace
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    extra_layers: Vec<PathBuf>,
    skip_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `path` after the environment layer and before the workspace file
    pub fn with_layer(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_layers.push(path.into());
        self
    }

    /// Ignore `DEPCMD_CONFIG`
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Merge every layer and validate the result.
    ///
    /// Fails with `InvalidConfig` when the merged document does not validate.
    pub fn load(&self, workspace_root: Option<&Path>) -> Result<ConfigSchema> {
        let base = builtin_config().unwrap_or_else(|e| {
            warn!("Failed to load built-in config: {e}, using fallback");
            fallback_config()
        });
        let mut merger = ConfigMerger::new(&base)?;

        if !self.skip_env {
            if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
                debug!("Using {CONFIG_ENV_VAR}={:?}", path);
                merger.add_file(&path)?;
            }
        }

        for path in &self.extra_layers {
            merger.add_file(path)?;
        }

        if let Some(root) = workspace_root {
            let path = user_config_path(root);
            if path.is_file() {
                merger.add_file(&path)?;
            } else {
                debug!("No workspace config at {:?}", path);
            }
        }

        let config = merger.merged()?;
        config.validate().into_result()?;

        info!(
            "Loaded configuration v{} ({} project types, {} categories, {} layer(s))",
            config.version,
            config.project_types.len(),
            config.categories.len(),
            merger.config_info().layer_paths.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_user_config_is_builtin() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::new().without_env().load(Some(dir.path())).unwrap();
        assert_eq!(config, builtin_config().unwrap());
    }

    #[test]
    fn test_workspace_layer_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = user_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"projectTypes": [{"id": "git", "priority": 1000}]}"#,
        )
        .unwrap();

        let config = ConfigLoader::new().without_env().load(Some(dir.path())).unwrap();
        assert_eq!(config.project_type("git").unwrap().priority, 1000);
    }

    #[test]
    fn test_invalid_merge_is_refused() {
        let dir = TempDir::new().unwrap();
        let layer = dir.path().join("layer.json");
        std::fs::write(
            &layer,
            r#"{"projectTypes": [{"id": "broken", "displayName": "Broken", "detectionRules": []}]}"#,
        )
        .unwrap();

        let err = ConfigLoader::new()
            .without_env()
            .with_layer(&layer)
            .load(None)
            .unwrap_err();
        match err {
            Error::InvalidConfig(errors) => {
                assert!(errors.iter().any(|e| e.contains("'broken'")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
