use anyhow::{Context, Result};
use depcmd_core::config::SchemaConfigProvider;
use depcmd_core::{DetectionStrategy, ProjectDetectionResult, ProjectDetector};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::display::{print_detection, print_scripts};
use crate::utils::{load_config, resolve_root};

/// Run detection on `path` with optional overrides of the configured settings
pub fn detect_workspace(
    path: Option<&Path>,
    strategy: Option<DetectionStrategy>,
    min_score: Option<u32>,
) -> Result<(Arc<SchemaConfigProvider>, ProjectDetectionResult)> {
    let root = resolve_root(path)?;
    let config = load_config(&root)?;

    let mut settings = config.detection.clone();
    if let Some(strategy) = strategy {
        settings = settings.with_strategy(strategy);
    }
    if let Some(min_score) = min_score {
        settings = settings.with_min_detection_score(min_score);
    }
    debug!("Detection settings: {:?}", settings);

    let provider = Arc::new(SchemaConfigProvider::new(config));
    let detector = ProjectDetector::with_settings(provider.clone(), settings)
        .context("Failed to start the detection engine")?;
    let result = detector.detect_project(Some(&root), false);
    Ok((provider, result))
}

pub fn detect_command(
    path: Option<&Path>,
    strategy: Option<DetectionStrategy>,
    min_score: Option<u32>,
    json: bool,
    details: bool,
) -> Result<()> {
    let (_, result) = detect_workspace(path, strategy, min_score)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_detection(&result, details);
    }
    Ok(())
}

pub fn scripts_command(path: Option<&Path>, json: bool) -> Result<()> {
    let (_, result) = detect_workspace(path, None, None)?;

    if json {
        let mut scripts = serde_json::Map::new();
        for detected in &result.detected_project_types {
            scripts.insert(detected.id.clone(), serde_json::to_value(&detected.scripts)?);
        }
        println!("{}", serde_json::to_string_pretty(&scripts)?);
    } else {
        print_scripts(&result);
    }
    Ok(())
}
