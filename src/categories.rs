//! Fixed category set and the keyword classifier
//!
//! Every tool belongs to exactly one category, chosen by keyword matching
//! against its tags first, then its file name. Categories are scanned in
//! declaration order and the first match wins, so the order of
//! [`Category::ALL`] and of each keyword list is load-bearing: reordering
//! either can silently re-bucket existing tools.

use serde::{Deserialize, Serialize};

/// Menu grouping for a tool. Not user-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Development,
    Media,
    File,
    System,
    Network,
    Utility,
}

/// Static display data and keyword list for one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub icon: &'static str,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

impl Category {
    /// All categories in classification order. First match wins.
    pub const ALL: [Category; 6] = [
        Category::Development,
        Category::Media,
        Category::File,
        Category::System,
        Category::Network,
        Category::Utility,
    ];

    /// Fallback bucket for tools no keyword matches
    pub const DEFAULT: Category = Category::Utility;

    /// Stable key used in the persisted manual-override map
    pub fn key(self) -> &'static str {
        match self {
            Category::Development => "development",
            Category::Media => "media",
            Category::File => "file",
            Category::System => "system",
            Category::Network => "network",
            Category::Utility => "utility",
        }
    }

    /// Look up a category by its stable key
    pub fn from_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Display data for this category
    pub fn info(self) -> CategoryInfo {
        match self {
            Category::Development => CategoryInfo {
                icon: "💻",
                name: "Development Tools",
                keywords: &["git", "commit", "ssh", "server", "remote", "database"],
            },
            Category::Media => CategoryInfo {
                icon: "🎬",
                name: "Media & Multimedia",
                keywords: &[
                    "image",
                    "video",
                    "photo",
                    "picture",
                    "watermark",
                    "compress",
                    "converter",
                    "media",
                ],
            },
            Category::File => CategoryInfo {
                icon: "📁",
                name: "File System",
                keywords: &[
                    "backup",
                    "folder",
                    "clean",
                    "temp",
                    "organizer",
                    "rename",
                    "duplicate",
                    "copy",
                    "changed",
                ],
            },
            Category::System => CategoryInfo {
                icon: "⚙️",
                name: "System Tools",
                keywords: &[
                    "setup",
                    "project",
                    "linux",
                    "docker",
                    "tree",
                    "xampp",
                    "bootstrap",
                ],
            },
            Category::Network => CategoryInfo {
                icon: "🌐",
                name: "Network & Web",
                keywords: &[
                    "website",
                    "performance",
                    "check",
                    "qr",
                    "code",
                    "json",
                    "format",
                ],
            },
            Category::Utility => CategoryInfo {
                icon: "🔧",
                name: "Utility Tools",
                keywords: &[
                    "pdf", "text", "encoding", "find", "replace", "scan", "malware",
                ],
            },
        }
    }

    /// Classify a tool from its name and tags.
    ///
    /// Pure function of its inputs and the static keyword table. Tags are
    /// checked before the name: a tool tagged `ssh` lands in Development
    /// even if its file name says otherwise.
    pub fn classify(tool_name: &str, tags: &[String]) -> Category {
        let name_lower = tool_name.to_lowercase();

        for category in Category::ALL {
            let keywords = category.info().keywords;
            for tag in tags {
                let tag_lower = tag.to_lowercase();
                if keywords.iter().any(|kw| tag_lower.contains(kw)) {
                    return category;
                }
            }
        }

        for category in Category::ALL {
            let keywords = category.info().keywords;
            if keywords.iter().any(|kw| name_lower.contains(kw)) {
                return category;
            }
        }

        Category::DEFAULT
    }
}
