//! Error types for the toolbelt launcher

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the launcher library
#[derive(Debug, Error)]
pub enum LauncherError {
    // === Tool resolution errors ===
    /// Tool script not found in any known layout
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool directory not found
    #[error("Tool directory not found: {0}")]
    ToolDirMissing(String),

    // === Invocation errors ===
    /// Failed to spawn the tool process
    #[error("Failed to start tool {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    // === Archive errors ===
    /// Archive does not contain a recognizable tool layout
    #[error("Cannot determine tool identity from archive: {0}")]
    UnrecognizedArchive(PathBuf),

    /// Import source is neither a zip file nor a tool directory
    #[error("Invalid import source: {0}")]
    InvalidImportSource(PathBuf),

    // === State errors ===
    /// Registry state could not be written
    #[error("Failed to save registry state to {path}: {source}")]
    StateSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === External errors ===
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip archive error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // === Generic errors ===
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for the launcher library
pub type Result<T> = std::result::Result<T, LauncherError>;

impl LauncherError {
    /// Create a tool not found error
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        LauncherError::ToolNotFound(tool.into())
    }

    /// Create a tool directory missing error
    pub fn tool_dir_missing(tool: impl Into<String>) -> Self {
        LauncherError::ToolDirMissing(tool.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        LauncherError::Internal(msg.into())
    }

    /// Check if this error means the tool simply is not on disk
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LauncherError::ToolNotFound(_) | LauncherError::ToolDirMissing(_)
        )
    }
}
