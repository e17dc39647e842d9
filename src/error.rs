//! Error types shared by the table subsystems.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::parser::LineError;

/// Errors that can occur while configuring, loading or running a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Invalid or empty source set, bad interval, etc.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`TableConfig`](crate::config::TableConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A line in a source file violates the line grammar.
    #[error("{}:{line_no}: {reason} (line: {line:?})", .path.display())]
    Parse {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: LineError,
    },

    /// A source file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `init` was called on a table whose reload loop is already running.
    #[error("reload loop already running")]
    AlreadyRunning,

    /// `init` was called outside of a tokio runtime.
    #[error("no tokio runtime available to run the reload loop")]
    NoRuntime,
}

/// Result alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
