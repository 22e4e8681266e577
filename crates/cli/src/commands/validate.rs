use anyhow::{Context, Result, bail};
use depcmd_core::config::{ConfigMerger, ConfigSchema, builtin_config, user_config_path};
use std::path::{Path, PathBuf};

use crate::utils::resolve_root;

pub fn validate_command(file: Option<&Path>) -> Result<()> {
    let file: PathBuf = match file {
        Some(file) if !file.is_file() => bail!("File not found: {}", file.display()),
        Some(file) => file.to_path_buf(),
        None => {
            let root = resolve_root(None)?;
            ConfigSchema::find_config_file(&root).unwrap_or_else(|| user_config_path(&root))
        }
    };

    let mut merger = ConfigMerger::new(&builtin_config()?)?;
    if file.is_file() {
        merger
            .add_file(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        println!(
            "🔍 Validating {} over the built-in configuration",
            file.display()
        );
    } else {
        println!(
            "🔍 No configuration at {}, validating built-in configuration",
            file.display()
        );
    }

    let config = merger
        .merged()
        .context("Merged configuration does not match the schema")?;
    let report = config.validate();
    if !report.valid {
        for error in &report.errors {
            println!("   ❌ {error}");
        }
        bail!("Configuration has {} error(s)", report.errors.len());
    }

    println!(
        "✅ Configuration is valid ({} project types, {} categories, {} commands)",
        config.project_types.len(),
        config.categories.len(),
        config.commands.len()
    );
    Ok(())
}
