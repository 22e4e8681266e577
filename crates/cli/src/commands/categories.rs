use anyhow::{Context, Result};
use depcmd_core::{CommandFilter, CommandStore, ConfigProvider, JsonCommandStore};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use super::deps::unavailable_categories;
use super::detect::detect_workspace;
use crate::display::{print_categories, print_command_groups};
use crate::utils::store_path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryEntry {
    id: String,
    display_name: String,
    icon: String,
    supported: bool,
    available: bool,
}

pub fn categories_command(
    path: Option<&Path>,
    suggested: bool,
    all: bool,
    skip_deps: bool,
    json: bool,
) -> Result<()> {
    let (provider, result) = detect_workspace(path, None, None)?;
    let filter = CommandFilter::new(provider.clone());

    let mut ids: Vec<String> = if suggested {
        filter.suggested_categories(&result)
    } else {
        let configured: Vec<String> =
            provider.categories().iter().map(|c| c.id.clone()).collect();
        if all {
            configured
        } else {
            filter.filter_categories(&configured, &result)
        }
    };

    let unavailable = if skip_deps {
        BTreeSet::new()
    } else {
        unavailable_categories(&provider, &ids)
    };
    if !all {
        ids.retain(|id| !unavailable.contains(id));
    }

    if json {
        let entries: Vec<CategoryEntry> = ids
            .iter()
            .map(|id| {
                let info = filter.category_display_info(id);
                CategoryEntry {
                    id: id.clone(),
                    display_name: info.display_name,
                    icon: info.icon,
                    supported: filter.is_category_supported(id, &result),
                    available: !unavailable.contains(id),
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let listed: Vec<_> = ids
        .iter()
        .map(|id| (id.clone(), filter.category_display_info(id)))
        .collect();
    let stats = filter.project_type_stats(&result);
    print_categories(&listed, all.then_some(&stats));
    if !unavailable.is_empty() {
        let missing: Vec<&str> = unavailable.iter().map(String::as_str).collect();
        println!("   Missing tools: {}", missing.join(", "));
    }
    Ok(())
}

pub fn commands_command(
    path: Option<&Path>,
    store: Option<&Path>,
    category: Option<&str>,
    skip_deps: bool,
    json: bool,
) -> Result<()> {
    let (provider, result) = detect_workspace(path, None, None)?;
    let filter = CommandFilter::new(provider.clone());

    let root = result
        .workspace_root
        .clone()
        .context("Detection did not report a workspace root")?;
    let store = JsonCommandStore::open(store_path(&root, store))
        .context("Failed to open the command store")?;

    let in_category = |c: &str| category.is_none_or(|wanted| wanted == c);

    let mut catalog = filter.visible_catalog_commands(&result);
    catalog.retain(|c| in_category(&c.category));

    let mut stored = filter.filter_commands(&store.list(), &result);
    stored.retain(|c| in_category(&c.category));

    if !skip_deps {
        let mut listed: Vec<String> = catalog
            .iter()
            .map(|c| c.category.clone())
            .chain(stored.iter().map(|c| c.category.clone()))
            .collect();
        listed.sort();
        listed.dedup();

        let unavailable = unavailable_categories(&provider, &listed);
        catalog.retain(|c| !unavailable.contains(&c.category));
        stored.retain(|c| !unavailable.contains(&c.category));
    }

    if json {
        let listing = serde_json::json!({
            "catalog": catalog,
            "stored": stored,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_command_groups(&catalog, &stored, |id| filter.category_display_info(id));
    }
    Ok(())
}
