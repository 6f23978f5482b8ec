//! Error types for agentsmd.
//!
//! Library crates use [`AgentsMdError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all agentsmd operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentsMdError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Target folder does not exist.
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// Target path exists but is not a directory.
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Target folder has no `*.md` files to analyze.
    #[error("No markdown files found in: {}", .0.display())]
    NoMarkdownFiles(PathBuf),

    /// A file named by an analysis artifact or on the command line is gone.
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Front-matter or artifact parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// JSON (de)serialization error for artifacts and reports.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AgentsMdError>;

impl AgentsMdError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stems from bad user input rather than a fault
    /// while processing it.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::FolderNotFound(_)
                | Self::NotADirectory(_)
                | Self::NoMarkdownFiles(_)
                | Self::MissingFile(_)
        )
    }
}

impl From<serde_json::Error> for AgentsMdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
