//! Persisted registry state
//!
//! One JSON document holds everything that survives a restart: favorites,
//! recent tools, disabled tools, shell settings, usage statistics, and
//! manual category overrides. Loading is forgiving: missing keys are
//! back-filled with defaults and an unreadable file degrades to a fresh
//! default state, never an error. Saving is synchronous and immediate
//! after every mutation; there is no locking (single-process assumption).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::types::{LauncherError, Result};

/// File name of the registry state document
pub const STATE_FILE_NAME: &str = "tool_config.json";

/// Free-form shell settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Show tool descriptions in the menu
    pub show_descriptions: bool,
    /// Upper bound on the recent list
    pub max_recent: usize,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            show_descriptions: true,
            max_recent: 10,
        }
    }
}

/// Per-tool usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStatistics {
    /// Tool name -> invocation count
    pub tool_usage: BTreeMap<String, u64>,
    /// Tool name -> last-used unix timestamp in seconds
    pub last_used: BTreeMap<String, f64>,
}

/// The persisted registry state document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryState {
    /// Favorite tool names, insertion order preserved
    pub favorites: Vec<String>,
    /// Recently run tool names, most recent first, bounded by
    /// `settings.max_recent`
    pub recent: Vec<String>,
    /// Tool names hidden from the active list
    pub disabled_tools: Vec<String>,
    /// Shell settings
    pub settings: ShellSettings,
    /// Usage statistics
    pub statistics: UsageStatistics,
    /// Explicit category assignments that win over the classifier
    pub manual_categories: BTreeMap<String, Category>,
}

/// Owns the state document and the path it persists to
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    pub state: RegistryState,
}

impl StateStore {
    /// Open a store at the given path, loading existing state if present.
    ///
    /// A missing file yields the default state. A corrupt file is logged
    /// and also yields the default state — state corruption is repaired,
    /// never fatal.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load(&path);
        Self { path, state }
    }

    /// Default state-file location: the user data directory, falling back
    /// to the current directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("toolbelt"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STATE_FILE_NAME)
    }

    fn load(path: &Path) -> RegistryState {
        if !path.exists() {
            return RegistryState::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("Failed to parse state file {:?}: {}", path, e);
                    RegistryState::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read state file {:?}: {}", path, e);
                RegistryState::default()
            }
        }
    }

    /// Write the state document to disk, creating parent directories as
    /// needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| LauncherError::StateSave {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, json).map_err(|source| LauncherError::StateSave {
            path: self.path.clone(),
            source,
        })
    }

    /// Path this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }
}
