use anyhow::Result;
use clap::{Parser, Subcommand};
use depcmd_core::DetectionStrategy;
use std::path::PathBuf;

use crate::commands::{
    categories_command, commands_command, deps_command, detect_command, init_command,
    scripts_command, store_command, validate_command,
};

/// Detect project ecosystems and surface the commands that matter for them
#[derive(Parser, Debug)]
#[command(name = "depcmd")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(
    after_help = "ENVIRONMENT:\n    RUST_LOG=debug          Enable debug logging\n    DEPCMD_CONFIG=<FILE>    Extra configuration layer applied before the workspace file"
)]
pub struct Cli {
    /// Command store file (defaults to <workspace>/.depcmd/commands.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the project types of a workspace
    #[command(visible_alias = "d")]
    Detect {
        /// Workspace root (defaults to the current directory)
        path: Option<PathBuf>,

        /// Override the configured strategy (aggressive, conservative, balanced)
        #[arg(short, long)]
        strategy: Option<DetectionStrategy>,

        /// Override the minimum score a type needs to be reported
        #[arg(long)]
        min_score: Option<u32>,

        /// Print the full detection result as JSON
        #[arg(long)]
        json: bool,

        /// Show the per-rule scoring trace of every project type
        #[arg(short, long)]
        details: bool,
    },
    /// List the scripts derived from project manifests
    Scripts {
        path: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// List the command categories that apply to a workspace
    Categories {
        path: Option<PathBuf>,

        /// Rank categories by relevance instead of configuration order
        #[arg(long)]
        suggested: bool,

        /// Also list unsupported categories
        #[arg(short, long)]
        all: bool,

        /// Do not hide categories whose dependency check fails
        #[arg(long)]
        skip_deps: bool,

        #[arg(long)]
        json: bool,
    },
    /// List catalog and stored commands visible for a workspace
    #[command(visible_alias = "c")]
    Commands {
        path: Option<PathBuf>,

        /// Only show commands of this category
        #[arg(short, long)]
        category: Option<String>,

        /// Do not hide categories whose dependency check fails
        #[arg(long)]
        skip_deps: bool,

        #[arg(long)]
        json: bool,
    },
    /// Manage user-defined commands
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Check which category tools are installed
    Deps {
        path: Option<PathBuf>,

        /// Overall deadline for all checks in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration layer merged over the built-in configuration
    Validate {
        /// Layer to validate (defaults to the workspace configuration)
        file: Option<PathBuf>,
    },
    /// Write an example workspace configuration
    Init {
        path: Option<PathBuf>,

        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StoreAction {
    /// Add a command
    Add {
        label: String,

        /// Shell command line to run
        command: String,

        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        icon: Option<String>,
    },
    /// List stored commands
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Change fields of a stored command
    Update {
        id: u64,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        command: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        icon: Option<String>,
    },
    /// Remove a stored command
    #[command(visible_alias = "rm")]
    Remove { id: u64 },
    /// Search label, command, description and category
    Search { query: String },
    /// Move every command of a category to another category
    RenameCategory { from: String, to: String },
    /// Remove every command of a category
    DeleteCategory { category: String },
    /// Write all stored commands as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load commands from an exported JSON file
    Import {
        file: PathBuf,

        /// Keep existing commands instead of replacing them
        #[arg(short, long)]
        merge: bool,
    },
}

impl Cli {
    /// Execute the selected subcommand
    pub fn execute(self) -> Result<()> {
        let store = self.store;
        match self.command {
            Commands::Detect {
                path,
                strategy,
                min_score,
                json,
                details,
            } => detect_command(path.as_deref(), strategy, min_score, json, details),
            Commands::Scripts { path, json } => scripts_command(path.as_deref(), json),
            Commands::Categories {
                path,
                suggested,
                all,
                skip_deps,
                json,
            } => categories_command(path.as_deref(), suggested, all, skip_deps, json),
            Commands::Commands {
                path,
                category,
                skip_deps,
                json,
            } => commands_command(
                path.as_deref(),
                store.as_deref(),
                category.as_deref(),
                skip_deps,
                json,
            ),
            Commands::Store { action } => store_command(store.as_deref(), action),
            Commands::Deps {
                path,
                timeout_ms,
                json,
            } => deps_command(path.as_deref(), timeout_ms, json),
            Commands::Validate { file } => validate_command(file.as_deref()),
            Commands::Init { path, force } => init_command(path.as_deref(), force),
        }
    }
}
