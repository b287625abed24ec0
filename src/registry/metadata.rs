//! Tool metadata: `tool_info.json`, display names, generated tags
//!
//! Metadata is optional everywhere. A tool directory may carry a
//! `tool_info.json` with `{name, tags}`; when it does not (or the file is
//! unreadable), both are generated from the tool file name. Help text is
//! likewise an explicit `Option`: present only when the tool directory
//! ships a doc file.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::types::ToolMetadata;

/// Metadata file name inside a tool directory
pub const METADATA_FILE: &str = "tool_info.json";

/// Doc file names checked for help text, in order
const DOC_FILES: &[&str] = &["doc.md", "doc.txt"];

/// Keyword -> display word translation used when generating a display
/// name from a kebab-case tool file name.
static DISPLAY_WORDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("backup", "Back Up"),
        ("folder", "Folder"),
        ("clean", "Clean"),
        ("temp", "Temp Files"),
        ("compress", "Compress"),
        ("image", "Images"),
        ("copy", "Copy"),
        ("changed", "Changed"),
        ("duplicate", "Duplicate"),
        ("finder", "Finder"),
        ("extract", "Extract"),
        ("archive", "Archive"),
        ("file", "Files"),
        ("organizer", "Organizer"),
        ("find", "Find"),
        ("replace", "Replace"),
        ("generate", "Generate"),
        ("tree", "Tree"),
        ("watermark", "Watermark"),
        ("pdf", "PDF"),
        ("rename", "Rename"),
        ("setup", "Set Up"),
        ("project", "Project"),
        ("linux", "Linux"),
        ("text", "Text"),
        ("encoding", "Encoding"),
        ("converter", "Converter"),
        ("video", "Video"),
        ("ssh", "SSH"),
        ("manager", "Manager"),
        ("server", "Server"),
    ])
});

/// Load `tool_info.json` from a tool directory.
///
/// Returns `None` when the file is absent or unparseable; the caller
/// falls back to generated metadata either way.
pub fn load_metadata(tool_dir: &Path) -> Option<ToolMetadata> {
    let path = tool_dir.join(METADATA_FILE);
    if !path.is_file() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

/// Load help text from a tool directory's doc file, if it ships one.
pub fn load_help(tool_dir: &Path) -> Option<String> {
    for doc in DOC_FILES {
        let path = tool_dir.join(doc);
        if path.is_file() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", path, e);
                }
            }
        }
    }
    None
}

/// Strip the tool extension from a tool file name.
pub fn tool_stem(tool: &str) -> &str {
    tool.strip_suffix(".py").unwrap_or(tool)
}

/// Generate a display name from a kebab-case tool file name.
///
/// Known keywords are translated via [`DISPLAY_WORDS`]; unknown words are
/// capitalized as-is.
pub fn generate_display_name(tool: &str) -> String {
    tool_stem(tool)
        .split('-')
        .map(|word| {
            DISPLAY_WORDS
                .get(word)
                .map(|w| (*w).to_string())
                .unwrap_or_else(|| capitalize(word))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate search tags from a tool file name: every kebab word, the full
/// stem, plus a few domain extras keyed off well-known words.
pub fn generate_tags(tool: &str) -> Vec<String> {
    let stem = tool_stem(tool).to_lowercase();
    let mut tags: Vec<String> = stem.split('-').map(str::to_string).collect();
    tags.push(stem.clone());

    let extras: &[&str] = if stem.contains("image") || stem.contains("photo") {
        &["picture", "graphics"]
    } else if stem.contains("video") {
        &["movie", "clip"]
    } else if stem.contains("pdf") {
        &["document"]
    } else if stem.contains("backup") {
        &["archive", "restore"]
    } else if stem.contains("compress") || stem.contains("zip") {
        &["shrink", "archive"]
    } else if stem.contains("ssh") {
        &["ssh", "remote", "server"]
    } else {
        &[]
    };
    tags.extend(extras.iter().map(|s| (*s).to_string()));

    // De-duplicate, keeping first occurrence
    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
