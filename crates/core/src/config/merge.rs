//! Configuration merging
//!
//! Layers are applied in order over the built-in document:
//! built-in -> `DEPCMD_CONFIG` file -> workspace `.depcmd/config.json`.
//! Entries of `projectTypes` and `categories` are matched by `id`; a matching
//! user entry replaces the top-level fields it names and keeps the rest.

use super::ConfigSchema;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sections whose entries are merged by `id`
const ID_KEYED_SECTIONS: [&str; 2] = ["projectTypes", "categories"];

/// Sections merged key by key
const KEYED_SECTIONS: [&str; 3] = ["customFunctions", "dependencyDetection", "detection"];

#[derive(Debug, Clone, Default)]
pub struct ConfigInfo {
    /// Files that contributed a layer, in application order
    pub layer_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ConfigMerger {
    merged: Value,
    config_info: ConfigInfo,
}

impl ConfigMerger {
    /// Start from an already-parsed base document
    pub fn new(base: &ConfigSchema) -> Result<Self> {
        Ok(Self {
            merged: serde_json::to_value(base)?,
            config_info: ConfigInfo::default(),
        })
    }

    pub fn config_info(&self) -> &ConfigInfo {
        &self.config_info
    }

    /// Apply a layer read from `path`
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        debug!("Merging config layer from: {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        let layer: Value = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;
        self.add_layer(layer)?;
        self.config_info.layer_paths.push(path.to_path_buf());
        Ok(())
    }

    /// Apply an in-memory layer
    pub fn add_layer(&mut self, layer: Value) -> Result<()> {
        let Value::Object(layer) = layer else {
            return Err(Error::ConfigError(
                "configuration layer must be a JSON object".to_string(),
            ));
        };
        let Value::Object(base) = &mut self.merged else {
            return Err(Error::ConfigError(
                "base configuration is not a JSON object".to_string(),
            ));
        };
        merge_document(base, layer);
        Ok(())
    }

    /// Deserialize the merged document
    pub fn merged(&self) -> Result<ConfigSchema> {
        serde_json::from_value(self.merged.clone())
            .map_err(|e| Error::ConfigError(format!("Merged configuration is malformed: {e}")))
    }
}

fn merge_document(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match base.get_mut(&key) {
            Some(Value::Array(existing))
                if ID_KEYED_SECTIONS.contains(&key.as_str()) && value.is_array() =>
            {
                if let Value::Array(entries) = value {
                    merge_by_id(existing, entries);
                }
            }
            Some(Value::Array(existing)) if key == "commands" && value.is_array() => {
                if let Value::Array(entries) = value {
                    debug!("Appending {} command(s)", entries.len());
                    existing.extend(entries);
                }
            }
            Some(Value::Object(existing))
                if KEYED_SECTIONS.contains(&key.as_str()) && value.is_object() =>
            {
                if let Value::Object(entries) = value {
                    existing.extend(entries);
                }
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_by_id(existing: &mut Vec<Value>, entries: Vec<Value>) {
    for entry in entries {
        let position = entry.get("id").and_then(Value::as_str).and_then(|id| {
            existing
                .iter()
                .position(|candidate| candidate.get("id").and_then(Value::as_str) == Some(id))
        });

        match (position, entry) {
            (Some(index), Value::Object(fields)) => match &mut existing[index] {
                Value::Object(target) => {
                    debug!("Overriding {} field(s) of entry {index}", fields.len());
                    target.extend(fields);
                }
                other => *other = Value::Object(fields),
            },
            (_, entry) => existing.push(entry),
        }
    }
}
