use anyhow::{Context, Result};
use depcmd_core::config::{ConfigLoader, ConfigSchema, USER_CONFIG_DIR};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the command store inside the workspace config directory
pub const STORE_FILE: &str = "commands.json";

/// Absolute workspace root, defaulting to the current directory
pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    root.canonicalize()
        .with_context(|| format!("Workspace not found: {}", root.display()))
}

/// Effective configuration for `root`, including `DEPCMD_CONFIG` and the workspace file
pub fn load_config(root: &Path) -> Result<ConfigSchema> {
    ConfigLoader::new()
        .load(Some(root))
        .with_context(|| format!("Failed to load configuration for {}", root.display()))
}

/// The explicit `--store` file, or `<root>/.depcmd/commands.json`
pub fn store_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(USER_CONFIG_DIR).join(STORE_FILE));
    debug!("Using command store at {:?}", path);
    path
}
