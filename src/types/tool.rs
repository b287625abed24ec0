//! Tool identity and metadata types

use serde::{Deserialize, Serialize};

/// Execution kind of a tool, determined by which tools subdirectory it
/// was discovered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// A regular script run through the interpreter (`tools/py/`)
    #[default]
    Standard,
    /// A bash-backed tool (`tools/sh/`); runs `app.sh` when present
    ShellWrapped,
}

impl ToolKind {
    /// Subdirectory name under the tools root for this kind
    pub fn dir_name(self) -> &'static str {
        match self {
            ToolKind::Standard => "py",
            ToolKind::ShellWrapped => "sh",
        }
    }

    /// Short marker shown next to the display name in the menu
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Standard => "PY",
            ToolKind::ShellWrapped => "SH",
        }
    }

    /// Resolve a kind from a tools subdirectory name
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "py" => Some(ToolKind::Standard),
            "sh" => Some(ToolKind::ShellWrapped),
            _ => None,
        }
    }
}

/// Optional per-tool metadata read from `tool_info.json` in the tool
/// directory. Missing fields fall back to values generated from the tool
/// file name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Human-readable display name
    #[serde(default)]
    pub name: Option<String>,

    /// Free-text tags used for search and category classification
    #[serde(default)]
    pub tags: Vec<String>,
}
