use anyhow::Result;
use depcmd_core::config::SchemaConfigProvider;
use depcmd_core::deps::DEFAULT_BATCH_DEADLINE;
use depcmd_core::{ConfigProvider, DependencyChecker};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::display::print_dependencies;
use crate::utils::{load_config, resolve_root};

pub fn deps_command(path: Option<&Path>, timeout_ms: Option<u64>, json: bool) -> Result<()> {
    let root = resolve_root(path)?;
    let config = load_config(&root)?;

    let checker = Arc::new(DependencyChecker::from_schema(&config));
    let deadline = timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_BATCH_DEADLINE);
    let results = checker.check_batch(&checker.configured_categories(), deadline);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_dependencies(&results);
    }
    Ok(())
}

/// Categories among `ids` whose configured dependency check fails
pub fn unavailable_categories(provider: &SchemaConfigProvider, ids: &[String]) -> BTreeSet<String> {
    let checked: Vec<String> = ids
        .iter()
        .filter(|id| provider.dependency_check(id).is_some())
        .cloned()
        .collect();
    if checked.is_empty() {
        return BTreeSet::new();
    }

    let checker = Arc::new(DependencyChecker::from_schema(provider.schema()));
    checker
        .check_batch(&checked, DEFAULT_BATCH_DEADLINE)
        .into_iter()
        .filter_map(|(category, available)| (!available).then_some(category))
        .collect()
}
