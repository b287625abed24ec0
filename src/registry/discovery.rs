//! Filesystem scan for runnable tools
//!
//! A tool lives in `tools/py/<name>/<name>.py` or `tools/sh/<name>/<name>.py`.
//! For backward compatibility the tools root itself is also scanned for
//! loose `.py` files and single-level `<name>/<name>.py` folders. Any
//! location that cannot be read contributes zero tools; scan errors never
//! abort discovery of the other locations.

use std::collections::HashSet;
use std::path::Path;

/// Extension of a tool's main entry file
pub const TOOL_EXT: &str = "py";

/// Scan the tools root for runnable tools.
///
/// Returns tool file names (e.g. `backup-folder.py`) in scan order,
/// de-duplicated first-seen-wins. The result is unsorted; ordering is the
/// manager's concern.
pub fn discover_tools(root: &Path) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tools: Vec<String> = Vec::new();

    if !root.exists() {
        return tools;
    }

    for kind_dir in ["py", "sh"] {
        scan_tool_dirs(&root.join(kind_dir), &mut seen, &mut tools);
    }
    scan_legacy_root(root, &mut seen, &mut tools);

    tools
}

/// Scan one kind directory (`tools/py` or `tools/sh`) one level deep for
/// `<name>/<name>.py` entries.
fn scan_tool_dirs(dir: &Path, seen: &mut HashSet<String>, tools: &mut Vec<String>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping unreadable tools directory {:?}: {}", dir, e);
            return;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let tool_file = format!("{name}.{TOOL_EXT}");
        if path.join(&tool_file).is_file() {
            push_unique(tool_file, seen, tools);
        }
    }
}

/// Legacy layout: loose `.py` files directly in the root, or
/// `<name>/<name>.py` folders beside the `py`/`sh` directories.
fn scan_legacy_root(root: &Path, seen: &mut HashSet<String>, tools: &mut Vec<String>) {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping unreadable tools root {:?}: {}", root, e);
            return;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == "py" || name == "sh" {
            continue;
        }
        if path.is_dir() {
            let tool_file = format!("{name}.{TOOL_EXT}");
            if path.join(&tool_file).is_file() {
                push_unique(tool_file, seen, tools);
            }
        } else if path.is_file() && name.ends_with(&format!(".{TOOL_EXT}")) {
            push_unique(name.to_string(), seen, tools);
        }
    }
}

fn push_unique(tool: String, seen: &mut HashSet<String>, tools: &mut Vec<String>) {
    if seen.insert(tool.clone()) {
        tools.push(tool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_tool(root: &Path, kind: &str, name: &str) {
        let dir = root.join(kind).join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.py")), "print('hi')\n").unwrap();
    }

    #[test]
    fn test_discovers_both_kinds() {
        let root = TempDir::new().unwrap();
        make_tool(root.path(), "py", "backup-folder");
        make_tool(root.path(), "py", "compress-images");
        make_tool(root.path(), "sh", "setup-project-linux");

        let mut tools = discover_tools(root.path());
        tools.sort();
        assert_eq!(
            tools,
            vec![
                "backup-folder.py",
                "compress-images.py",
                "setup-project-linux.py"
            ]
        );
    }

    #[test]
    fn test_ignores_dirs_without_main_file() {
        let root = TempDir::new().unwrap();
        make_tool(root.path(), "py", "real-tool");
        // A directory with no <name>.py inside is not a tool
        let empty = root.path().join("py").join("half-baked");
        std::fs::create_dir_all(&empty).unwrap();
        std::fs::write(empty.join("other.py"), "").unwrap();

        assert_eq!(discover_tools(root.path()), vec!["real-tool.py"]);
    }

    #[test]
    fn test_legacy_layouts() {
        let root = TempDir::new().unwrap();
        // Loose file in the root
        std::fs::write(root.path().join("quick-fix.py"), "").unwrap();
        // Single-level folder in the root
        let legacy = root.path().join("old-tool");
        std::fs::create_dir_all(&legacy).unwrap();
        std::fs::write(legacy.join("old-tool.py"), "").unwrap();
        // Non-tool noise
        std::fs::write(root.path().join("README.md"), "").unwrap();

        let mut tools = discover_tools(root.path());
        tools.sort();
        assert_eq!(tools, vec!["old-tool.py", "quick-fix.py"]);
    }

    #[test]
    fn test_duplicates_first_seen_wins() {
        let root = TempDir::new().unwrap();
        make_tool(root.path(), "py", "backup-folder");
        // Same name again via legacy layout
        let legacy = root.path().join("backup-folder");
        std::fs::create_dir_all(&legacy).unwrap();
        std::fs::write(legacy.join("backup-folder.py"), "").unwrap();

        let tools = discover_tools(root.path());
        assert_eq!(tools, vec!["backup-folder.py"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let root = TempDir::new().unwrap();
        let gone = root.path().join("nope");
        assert!(discover_tools(&gone).is_empty());
    }
}
