use anyhow::{Context, Result};
use depcmd_core::config::user_config_path;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::create_workspace_config;
use crate::utils::resolve_root;

pub fn init_command(path: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_root(path)?;
    let config_path = user_config_path(&root);

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&config_path, create_workspace_config())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Wrote example configuration to {:?}", config_path);

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Next steps:");
    println!("   Edit the example project type, category and command to fit your stack");
    println!("   Run `depcmd validate` to check the merged configuration");
    Ok(())
}
