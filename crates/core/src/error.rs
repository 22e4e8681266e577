use std::io;

/// Errors that can occur during depcmd operations
///
/// Filesystem probes made while detecting a project never produce one of
/// these; they are folded into a non-matching rule instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration:\n  {}", .0.join("\n  "))]
    InvalidConfig(Vec<String>),

    #[error("Unknown custom function: {0}")]
    UnknownCustomFunction(String),

    #[error("Command with id {0} not found")]
    CommandNotFound(u64),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for depcmd operations
pub type Result<T> = std::result::Result<T, Error>;
