use super::{CommandStore, CommandsData};
use crate::error::{Error, Result};
use crate::types::{CommandUpdate, NewCommand, UserCommand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    next_id: u64,
    #[serde(default)]
    commands: Vec<UserCommand>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            commands: Vec::new(),
        }
    }
}

/// [`CommandStore`] kept in memory and optionally mirrored to a JSON file.
///
/// Every mutation rewrites the file in full.
#[derive(Debug, Clone, Default)]
pub struct JsonCommandStore {
    path: Option<PathBuf>,
    data: StoreFile,
}

impl JsonCommandStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.is_file() {
            let contents = fs::read_to_string(&path)?;
            let data: StoreFile = serde_json::from_str(&contents).map_err(|e| {
                Error::StoreError(format!("Failed to parse {}: {e}", path.display()))
            })?;
            debug!("Loaded {} command(s) from {:?}", data.commands.len(), path);
            data
        } else {
            StoreFile::default()
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.data)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.data
            .commands
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::CommandNotFound(id))
    }

    fn sorted(mut commands: Vec<UserCommand>) -> Vec<UserCommand> {
        commands.sort_by(by_category_then_label);
        commands
    }
}

impl StoreFile {
    fn insert(
        &mut self,
        command: NewCommand,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<UserCommand> {
        require_text("label", &command.label)?;
        require_text("command", &command.command)?;
        require_text("category", &command.category)?;

        let now = Utc::now();
        let stored = UserCommand {
            id: self.next_id,
            label: command.label,
            command: command.command,
            description: command.description,
            category: command.category,
            icon: command.icon,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        };
        self.next_id += 1;
        self.commands.push(stored.clone());
        Ok(stored)
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::StoreError(format!("{field} must not be empty")));
    }
    Ok(())
}

fn by_category_then_label(a: &UserCommand, b: &UserCommand) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| a.label.cmp(&b.label))
}

impl CommandStore for JsonCommandStore {
    fn add(&mut self, command: NewCommand) -> Result<UserCommand> {
        let stored = self.data.insert(command, None)?;
        self.save()?;
        info!("Command added: {} (#{})", stored.label, stored.id);
        Ok(stored)
    }

    fn get(&self, id: u64) -> Result<UserCommand> {
        let index = self.position(id)?;
        Ok(self.data.commands[index].clone())
    }

    fn update(&mut self, id: u64, update: CommandUpdate) -> Result<UserCommand> {
        let index = self.position(id)?;
        for (field, value) in [
            ("label", &update.label),
            ("command", &update.command),
            ("category", &update.category),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        let command = &mut self.data.commands[index];

        if let Some(label) = update.label {
            command.label = label;
        }
        if let Some(cmd) = update.command {
            command.command = cmd;
        }
        if let Some(description) = update.description {
            command.description = Some(description);
        }
        if let Some(category) = update.category {
            command.category = category;
        }
        if let Some(icon) = update.icon {
            command.icon = Some(icon);
        }
        command.updated_at = Utc::now();

        let updated = command.clone();
        self.save()?;
        info!("Command updated: {} (#{id})", updated.label);
        Ok(updated)
    }

    fn remove(&mut self, id: u64) -> Result<UserCommand> {
        let index = self.position(id)?;
        let removed = self.data.commands.remove(index);
        self.save()?;
        info!("Command deleted: {} (#{id})", removed.label);
        Ok(removed)
    }

    fn list(&self) -> Vec<UserCommand> {
        Self::sorted(self.data.commands.clone())
    }

    fn list_by_category(&self, category: &str) -> Vec<UserCommand> {
        Self::sorted(
            self.data
                .commands
                .iter()
                .filter(|c| c.category == category)
                .cloned()
                .collect(),
        )
    }

    fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .data
            .commands
            .iter()
            .map(|c| c.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    fn search(&self, query: &str) -> Vec<UserCommand> {
        let needle = query.to_lowercase();
        Self::sorted(
            self.data
                .commands
                .iter()
                .filter(|c| {
                    c.label.to_lowercase().contains(&needle)
                        || c.command.to_lowercase().contains(&needle)
                        || c.category.to_lowercase().contains(&needle)
                        || c
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect(),
        )
    }

    fn rename_category(&mut self, from: &str, to: &str) -> Result<usize> {
        require_text("category", to)?;
        let now = Utc::now();
        let mut moved = 0;
        for command in self.data.commands.iter_mut().filter(|c| c.category == from) {
            command.category = to.to_string();
            command.updated_at = now;
            moved += 1;
        }

        if moved == 0 {
            return Err(Error::StoreError(format!("category '{from}' has no commands")));
        }
        self.save()?;
        info!("Category renamed: {from} -> {to} ({moved} commands)");
        Ok(moved)
    }

    fn delete_category(&mut self, category: &str) -> Result<usize> {
        let before = self.data.commands.len();
        self.data.commands.retain(|c| c.category != category);
        let removed = before - self.data.commands.len();

        if removed == 0 {
            return Err(Error::StoreError(format!("category '{category}' has no commands")));
        }
        self.save()?;
        info!("Category deleted: {category} ({removed} commands removed)");
        Ok(removed)
    }

    fn category_command_count(&self, category: &str) -> usize {
        self.data
            .commands
            .iter()
            .filter(|c| c.category == category)
            .count()
    }

    fn import(&mut self, data: CommandsData, merge: bool) -> Result<usize> {
        let mut next = if merge {
            self.data.clone()
        } else {
            StoreFile::default()
        };

        let count = data.commands.len();
        for command in data.commands {
            let created_at = command.created_at;
            next.insert(
                NewCommand {
                    label: command.label,
                    command: command.command,
                    description: command.description,
                    category: command.category,
                    icon: command.icon,
                },
                Some(created_at),
            )?;
        }

        self.data = next;
        self.save()?;
        info!("Imported {count} command(s)");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> JsonCommandStore {
        let mut store = JsonCommandStore::in_memory();
        store.add(NewCommand::new("Test", "cargo test", "rust")).unwrap();
        store.add(NewCommand::new("Build", "cargo build", "rust")).unwrap();
        store
            .add(NewCommand::new("Status", "git status", "git").with_description("Working tree"))
            .unwrap();
        store
    }

    #[test]
    fn test_ids_are_monotonic_and_timestamps_set() {
        let mut store = JsonCommandStore::in_memory();
        let a = store.add(NewCommand::new("A", "a", "x")).unwrap();
        let b = store.add(NewCommand::new("B", "b", "x")).unwrap();
        store.remove(b.id).unwrap();
        let c = store.add(NewCommand::new("C", "c", "x")).unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_listing_order() {
        let store = seeded();
        let labels: Vec<_> = store.list().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Status", "Build", "Test"]);
        assert_eq!(store.categories(), vec!["git", "rust"]);
        assert_eq!(store.category_command_count("rust"), 2);
    }

    #[test]
    fn test_update_keeps_creation_time() {
        let mut store = seeded();
        let before = store.get(1).unwrap();
        let after = store
            .update(
                1,
                CommandUpdate {
                    command: Some("cargo nextest run".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(after.label, "Test");
        assert_eq!(after.command, "cargo nextest run");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_missing_ids() {
        let mut store = seeded();
        assert!(matches!(store.get(99), Err(Error::CommandNotFound(99))));
        assert!(matches!(store.remove(99), Err(Error::CommandNotFound(99))));
    }

    #[test]
    fn test_rejects_blank_fields() {
        let mut store = JsonCommandStore::in_memory();
        assert!(matches!(
            store.add(NewCommand::new("  ", "ls", "custom")),
            Err(Error::StoreError(_))
        ));
    }

    #[test]
    fn test_update_rejects_blank_fields() {
        let mut store = seeded();
        let blank_label = CommandUpdate {
            label: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(store.update(1, blank_label), Err(Error::StoreError(_))));

        let blank_category = CommandUpdate {
            command: Some("cargo test --all".into()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(store.update(1, blank_category), Err(Error::StoreError(_))));

        let unchanged = store.get(1).unwrap();
        assert_eq!(
            (unchanged.label.as_str(), unchanged.command.as_str(), unchanged.category.as_str()),
            ("Test", "cargo test", "rust")
        );
        assert!(store.rename_category("rust", " ").is_err());
        assert_eq!(store.category_command_count("rust"), 2);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = seeded();
        let hits: Vec<_> = store.search("CARGO").into_iter().map(|c| c.id).collect();
        assert_eq!(hits, vec![2, 1]);
        assert_eq!(store.search("working tree").len(), 1);
        assert_eq!(store.search("GIT").len(), 1);
        assert!(store.search("docker").is_empty());
    }

    #[test]
    fn test_category_bulk_operations() {
        let mut store = seeded();
        assert_eq!(store.rename_category("rust", "cargo").unwrap(), 2);
        assert_eq!(store.categories(), vec!["cargo", "git"]);
        assert!(store.rename_category("rust", "cargo").is_err());

        assert_eq!(store.delete_category("cargo").unwrap(), 2);
        assert_eq!(store.list().len(), 1);
        assert!(store.delete_category("cargo").is_err());
    }

    #[test]
    fn test_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store/commands.json");

        let mut store = JsonCommandStore::open(&path).unwrap();
        store.add(NewCommand::new("Up", "docker compose up", "docker")).unwrap();
        store.add(NewCommand::new("Down", "docker compose down", "docker")).unwrap();
        store.remove(1).unwrap();

        let reopened = JsonCommandStore::open(&path).unwrap();
        assert_eq!(reopened.list().len(), 1);

        let mut reopened = reopened;
        let next = reopened.add(NewCommand::new("Ps", "docker ps", "docker")).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commands.json");
        fs::write(&path, "[not a store]").unwrap();
        assert!(matches!(JsonCommandStore::open(&path), Err(Error::StoreError(_))));
    }

    #[test]
    fn test_export_import() {
        let source = seeded();
        let exported = source.export();

        let mut target = JsonCommandStore::in_memory();
        target.add(NewCommand::new("Keep", "echo keep", "custom")).unwrap();

        assert_eq!(target.import(exported.clone(), true).unwrap(), 3);
        assert_eq!(target.list().len(), 4);

        assert_eq!(target.import(exported, false).unwrap(), 3);
        let ids: Vec<_> = target.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| (1..=3).contains(id)));

        let stats = target.stats();
        assert_eq!(stats.total_commands, 3);
        assert_eq!(stats.categories, 2);
        assert!(stats.last_updated.is_some());
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commands.json");
        let mut store = JsonCommandStore::open(&path).unwrap();
        store.add(NewCommand::new("Keep", "echo keep", "custom")).unwrap();

        let mut broken = JsonCommandStore::in_memory();
        broken.add(NewCommand::new("Good", "echo good", "custom")).unwrap();
        let mut data = broken.export();
        let mut blank = data.commands[0].clone();
        blank.label = "  ".into();
        data.commands.push(blank);

        for merge in [false, true] {
            assert!(matches!(store.import(data.clone(), merge), Err(Error::StoreError(_))));
            let labels: Vec<_> = store.list().into_iter().map(|c| c.label).collect();
            assert_eq!(labels, vec!["Keep"]);
        }

        let next = store.add(NewCommand::new("Next", "echo next", "custom")).unwrap();
        assert_eq!(next.id, 2);
        assert_eq!(JsonCommandStore::open(&path).unwrap().list().len(), 2);
    }
}
