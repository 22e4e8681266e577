//! depcmd-core - Project type detection and command filtering
//!
//! This crate provides functionality to:
//! - Score a workspace against declarative detection rules and decide which ecosystems it uses
//! - Identify package managers and derive runnable scripts from project manifests
//! - Filter command categories and catalog commands against a detection result
//! - Load, merge and validate the JSON configuration driving all of the above
//! - Persist user-defined commands and probe for the external tools they need
pub mod config;
pub mod deps;
pub mod detection;
pub mod error;
pub mod filter;
pub mod scripts;
pub mod store;
pub mod types;

mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{ConfigLoader, ConfigProvider, ConfigSchema, SchemaConfigProvider};
pub use deps::DependencyChecker;
pub use detection::{DetectionStrategy, ProjectDetector};
pub use filter::CommandFilter;
pub use scripts::{ScriptExtractor, ScriptRegistry};
pub use store::{CommandStore, JsonCommandStore};
