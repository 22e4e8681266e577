//! Persistence of user-defined commands

pub mod json_store;

pub use json_store::JsonCommandStore;

use crate::error::Result;
use crate::types::{CommandUpdate, NewCommand, UserCommand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portable snapshot used by import and export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandsData {
    #[serde(default)]
    pub commands: Vec<UserCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_commands: usize,
    pub categories: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

/// CRUD over [`UserCommand`] records.
///
/// Listings are ordered by category, then label.
pub trait CommandStore {
    /// Store a new command, assigning its id and timestamps
    fn add(&mut self, command: NewCommand) -> Result<UserCommand>;

    fn get(&self, id: u64) -> Result<UserCommand>;

    fn update(&mut self, id: u64, update: CommandUpdate) -> Result<UserCommand>;

    fn remove(&mut self, id: u64) -> Result<UserCommand>;

    fn list(&self) -> Vec<UserCommand>;

    fn list_by_category(&self, category: &str) -> Vec<UserCommand>;

    /// Distinct category names, sorted
    fn categories(&self) -> Vec<String>;

    /// Case-insensitive substring match on label, command, description and category
    fn search(&self, query: &str) -> Vec<UserCommand>;

    /// Move every command of `from` to `to`, returning how many moved
    fn rename_category(&mut self, from: &str, to: &str) -> Result<usize>;

    /// Remove every command of `category`, returning how many were removed
    fn delete_category(&mut self, category: &str) -> Result<usize>;

    fn category_command_count(&self, category: &str) -> usize {
        self.list_by_category(category).len()
    }

    fn export(&self) -> CommandsData {
        CommandsData {
            commands: self.list(),
        }
    }

    /// Load `data`, replacing existing commands unless `merge`.
    ///
    /// Imported commands get fresh ids.
    fn import(&mut self, data: CommandsData, merge: bool) -> Result<usize>;

    fn stats(&self) -> StoreStats {
        let commands = self.list();
        StoreStats {
            total_commands: commands.len(),
            categories: self.categories().len(),
            last_updated: commands.iter().map(|c| c.updated_at).max(),
        }
    }
}
