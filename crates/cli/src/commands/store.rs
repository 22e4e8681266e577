use anyhow::{Context, Result};
use depcmd_core::store::CommandsData;
use depcmd_core::{CommandStore, CommandUpdate, JsonCommandStore, NewCommand};
use std::fs;
use std::path::Path;

use crate::cli::StoreAction;
use crate::display::print_stored_commands;
use crate::utils::{resolve_root, store_path};

pub fn store_command(store: Option<&Path>, action: StoreAction) -> Result<()> {
    let root = resolve_root(None)?;
    let path = store_path(&root, store);
    let mut store = JsonCommandStore::open(&path)
        .with_context(|| format!("Failed to open command store {}", path.display()))?;

    match action {
        StoreAction::Add {
            label,
            command,
            category,
            description,
            icon,
        } => {
            let mut new = NewCommand::new(label, command, category);
            new.description = description;
            new.icon = icon;
            let added = store.add(new)?;
            println!("✅ Added #{} {} [{}]", added.id, added.label, added.category);
        }
        StoreAction::List { category, json } => {
            let commands = match category.as_deref() {
                Some(category) => store.list_by_category(category),
                None => store.list(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&commands)?);
            } else {
                print_stored_commands(&commands);
            }
        }
        StoreAction::Update {
            id,
            label,
            command,
            category,
            description,
            icon,
        } => {
            let updated = store.update(
                id,
                CommandUpdate {
                    label,
                    command,
                    description,
                    category,
                    icon,
                },
            )?;
            println!("✅ Updated #{} {}", updated.id, updated.label);
        }
        StoreAction::Remove { id } => {
            let removed = store.remove(id)?;
            println!("🗑️  Removed #{} {}", removed.id, removed.label);
        }
        StoreAction::Search { query } => {
            print_stored_commands(&store.search(&query));
        }
        StoreAction::RenameCategory { from, to } => {
            let moved = store.rename_category(&from, &to)?;
            println!("✅ Moved {moved} command(s) from {from} to {to}");
        }
        StoreAction::DeleteCategory { category } => {
            let removed = store.delete_category(&category)?;
            println!("🗑️  Removed {removed} command(s) from {category}");
        }
        StoreAction::Export { output } => {
            let data = serde_json::to_string_pretty(&store.export())?;
            match output {
                Some(output) => {
                    fs::write(&output, data)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    println!(
                        "✅ Exported {} command(s) to {}",
                        store.stats().total_commands,
                        output.display()
                    );
                }
                None => println!("{data}"),
            }
        }
        StoreAction::Import { file, merge } => {
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let data: CommandsData = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let imported = store.import(data, merge)?;
            println!("✅ Imported {imported} command(s)");
        }
    }
    Ok(())
}
