//! Plain-text rendering for the interactive shell
//!
//! Rendering never prints on its own; every function returns a `String`
//! so the REPL owns all terminal output and tests can assert on exact
//! text. The menu renderer also returns the displayed tool order, which
//! is the index space every numeric command operates in.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};

use crate::categories::Category;
use crate::registry::ToolManager;

/// Group the menu by category once the list grows past this size
const GROUP_THRESHOLD: usize = 5;

/// Render the main menu. Returns the text and the tools in displayed
/// order; numeric commands index into that order, 1-based.
pub fn menu(manager: &mut ToolManager) -> (String, Vec<String>) {
    let tools = manager.tool_list(false);
    let mut out = String::new();

    let _ = writeln!(out, "=== Tools ===");
    let _ = writeln!(
        out,
        "{} tools | {} favorites | {} recent",
        tools.len(),
        manager.favorites().len(),
        manager.recent_tools().len()
    );
    let _ = writeln!(out);

    let order = if tools.len() > GROUP_THRESHOLD {
        grouped(manager, &tools, &mut out)
    } else {
        flat(manager, &tools, 0, &mut out);
        tools
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "number = run, h = help, q = quit");
    (out, order)
}

fn grouped(manager: &mut ToolManager, tools: &[String], out: &mut String) -> Vec<String> {
    let mut order = Vec::with_capacity(tools.len());
    for category in Category::ALL {
        let members: Vec<String> = tools
            .iter()
            .filter(|t| manager.category_of(t.as_str()) == category)
            .cloned()
            .collect();
        if members.is_empty() {
            continue;
        }
        let info = category.info();
        let _ = writeln!(out, "{} {}", info.icon, info.name);
        flat(manager, &members, order.len(), out);
        order.extend(members);
    }
    order
}

fn flat(manager: &mut ToolManager, tools: &[String], offset: usize, out: &mut String) {
    let show_tags = manager.settings().show_descriptions;
    for (i, tool) in tools.iter().enumerate() {
        let star = if manager.is_favorite(tool) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{star}{:>3}. {}",
            offset + i + 1,
            manager.labeled_display_name(tool)
        );
        if show_tags {
            let tags = manager.tags(tool);
            if !tags.is_empty() {
                let _ = writeln!(out, "        {}", tags.join(", "));
            }
        }
    }
}

/// Render search results in rank order, numbered into the given order so
/// the next numeric command can run a hit directly.
pub fn search_results(manager: &mut ToolManager, query: &str, results: &[String]) -> String {
    let mut out = String::new();
    if results.is_empty() {
        let _ = writeln!(out, "No tools matching '{query}'");
        return out;
    }
    let _ = writeln!(out, "{} tools matching '{query}':", results.len());
    flat(manager, results, 0, &mut out);
    out
}

pub fn favorites(manager: &mut ToolManager) -> String {
    let favs: Vec<String> = manager.favorites().to_vec();
    let mut out = String::new();
    if favs.is_empty() {
        let _ = writeln!(out, "No favorites yet. Add one with f+ <number>.");
        return out;
    }
    let _ = writeln!(out, "Favorites:");
    flat(manager, &favs, 0, &mut out);
    out
}

pub fn recent(manager: &mut ToolManager) -> String {
    let recent = manager.recent_tools();
    let mut out = String::new();
    if recent.is_empty() {
        let _ = writeln!(out, "No recent tools.");
        return out;
    }
    let _ = writeln!(out, "Recent (newest first, r <number> to run):");
    flat(manager, &recent, 0, &mut out);
    out
}

/// Render the disabled list. Returns the text and the list itself, which
/// is the index space of the `on` command.
pub fn disabled(manager: &mut ToolManager) -> (String, Vec<String>) {
    let disabled = manager.disabled_tools();
    let mut out = String::new();
    if disabled.is_empty() {
        let _ = writeln!(out, "No disabled tools.");
        return (out, disabled);
    }
    let _ = writeln!(out, "Disabled tools (on <number> to re-enable):");
    for (i, tool) in disabled.iter().enumerate() {
        let _ = writeln!(out, " {:>3}. {}", i + 1, manager.labeled_display_name(tool));
    }
    (out, disabled)
}

pub fn stats(manager: &mut ToolManager) -> String {
    let rows = manager.usage_stats();
    let mut out = String::new();
    if rows.is_empty() {
        let _ = writeln!(out, "No usage recorded yet.");
        return out;
    }
    let _ = writeln!(out, "Usage ({} total runs):", manager.total_usage());
    for (tool, count, last_used) in rows {
        let name = manager.labeled_display_name(&tool);
        let when = last_used
            .and_then(format_timestamp)
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(out, "  {count:>5}x  {name}  (last: {when})");
    }
    out
}

fn format_timestamp(secs: f64) -> Option<String> {
    let ts = Local.timestamp_opt(secs as i64, 0).single()?;
    Some(ts.format("%Y-%m-%d %H:%M").to_string())
}

pub fn settings(manager: &ToolManager) -> String {
    let s = manager.settings();
    let mut out = String::new();
    let _ = writeln!(out, "Settings:");
    let _ = writeln!(out, "  show_descriptions = {}", s.show_descriptions);
    let _ = writeln!(out, "  max_recent        = {}", s.max_recent);
    let _ = writeln!(out, "Change with: set <key> <value>");
    out
}

pub fn help() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Commands:");
    let _ = writeln!(out, "  <number>           run a tool");
    let _ = writeln!(out, "  <number>h          show a tool's help text");
    let _ = writeln!(out, "  l, list            show the menu again");
    let _ = writeln!(out, "  s <text>, /<text>  search tools");
    let _ = writeln!(out, "  f                  list favorites");
    let _ = writeln!(out, "  f+ <n>, f- <n>     add/remove a favorite");
    let _ = writeln!(out, "  r                  list recent tools");
    let _ = writeln!(out, "  r <n>              run the nth recent tool");
    let _ = writeln!(out, "  off <n,...>        disable tools (menu numbers)");
    let _ = writeln!(out, "  on <n,...>         re-enable tools (disabled-list numbers)");
    let _ = writeln!(out, "  disabled           list disabled tools");
    let _ = writeln!(out, "  stats              usage statistics");
    let _ = writeln!(out, "  set                show settings");
    let _ = writeln!(out, "  set <key> <value>  change a setting");
    let _ = writeln!(out, "  cat <n> <name>     pin a tool to a category");
    let _ = writeln!(out, "  export <n>         export a tool to a zip archive");
    let _ = writeln!(out, "  import <path>      import a tool from a zip or directory");
    let _ = writeln!(out, "  delete <n>         delete a tool");
    let _ = writeln!(out, "  h, ?               this help");
    let _ = writeln!(out, "  q, 0               quit");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{StateStore, STATE_FILE_NAME};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn manager_with(tools: &[&str]) -> (TempDir, ToolManager) {
        let root = TempDir::new().unwrap();
        let tools_dir = root.path().join("tools");
        for stem in tools {
            let dir = tools_dir.join("py").join(stem);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(format!("{stem}.py")), "").unwrap();
        }
        let store = StateStore::open(root.path().join(STATE_FILE_NAME));
        (root, ToolManager::new(tools_dir, store))
    }

    #[test]
    fn test_small_menu_is_flat_and_ordered() {
        let (_root, mut manager) = manager_with(&["bb-tool", "aa-tool"]);
        let (text, order) = menu(&mut manager);
        assert_eq!(order, vec!["aa-tool.py", "bb-tool.py"]);
        assert!(text.contains("  1. [PY] Aa Tool"));
        assert!(text.contains("  2. [PY] Bb Tool"));
        // No category headers below the grouping threshold
        assert!(!text.contains("Development"));
    }

    #[test]
    fn test_large_menu_groups_by_category() {
        let (_root, mut manager) = manager_with(&[
            "ssh-manager",
            "image-compress",
            "backup-folder",
            "docker-setup",
            "qr-code",
            "pdf-watermark",
        ]);
        let (text, order) = menu(&mut manager);
        assert_eq!(order.len(), 6);
        assert!(text.contains("Development"));
        assert!(text.contains("Media"));
        // Numbering is continuous across groups and matches the order
        for (i, tool) in order.iter().enumerate() {
            let needle = format!("{:>3}. ", i + 1);
            assert!(text.contains(&needle), "missing index for {tool}");
        }
        // Group order follows the category declaration order
        let dev_pos = text.find("Development").unwrap();
        let media_pos = text.find("Media").unwrap();
        assert!(dev_pos < media_pos);
    }

    #[test]
    fn test_menu_marks_favorites() {
        let (_root, mut manager) = manager_with(&["aa-tool", "bb-tool"]);
        manager.add_favorite("bb-tool.py").unwrap();
        let (text, _) = menu(&mut manager);
        assert!(text.contains("*  2. [PY] Bb Tool"));
        assert!(text.contains("   1. [PY] Aa Tool"));
    }

    #[test]
    fn test_menu_header_counts() {
        let (_root, mut manager) = manager_with(&["aa-tool", "bb-tool"]);
        manager.add_favorite("aa-tool.py").unwrap();
        let (text, _) = menu(&mut manager);
        assert!(text.contains("2 tools | 1 favorites | 0 recent"));
    }

    #[test]
    fn test_hidden_tags_when_descriptions_off() {
        let (_root, mut manager) = manager_with(&["ssh-manager"]);
        let (with_tags, _) = menu(&mut manager);
        assert!(with_tags.contains("remote"));

        manager
            .update_settings(|s| s.show_descriptions = false)
            .unwrap();
        let (without, _) = menu(&mut manager);
        assert!(!without.contains("remote"));
    }

    #[test]
    fn test_search_results_numbered_from_one() {
        let (_root, mut manager) = manager_with(&["backup-folder", "clean-temp"]);
        let hits = manager.search("backup", true);
        let text = search_results(&mut manager, "backup", &hits);
        assert!(text.contains("1 tools matching 'backup'"));
        assert!(text.contains("  1. [PY] Back Up Folder"));
    }

    #[test]
    fn test_disabled_listing_is_the_on_index_space() {
        let (_root, mut manager) = manager_with(&["aa-tool", "bb-tool", "cc-tool"]);
        manager.deactivate("cc-tool.py").unwrap();
        manager.deactivate("aa-tool.py").unwrap();
        let (text, listed) = disabled(&mut manager);
        // Alphabetical, regardless of deactivation order
        assert_eq!(listed, vec!["aa-tool.py", "cc-tool.py"]);
        assert!(text.contains("1. [PY] Aa Tool"));
        assert!(text.contains("2. [PY] Cc Tool"));
    }

    #[test]
    fn test_stats_sorted_by_count() {
        let (_root, mut manager) = manager_with(&["aa-tool", "bb-tool"]);
        manager.record_run("bb-tool.py").unwrap();
        manager.record_run("bb-tool.py").unwrap();
        manager.record_run("aa-tool.py").unwrap();
        let text = stats(&mut manager);
        assert!(text.contains("3 total runs"));
        let bb = text.find("Bb Tool").unwrap();
        let aa = text.find("Aa Tool").unwrap();
        assert!(bb < aa);
    }

    #[test]
    fn test_empty_states() {
        let (_root, mut manager) = manager_with(&[]);
        assert!(favorites(&mut manager).contains("No favorites"));
        assert!(recent(&mut manager).contains("No recent"));
        assert!(stats(&mut manager).contains("No usage"));
        let (text, listed) = disabled(&mut manager);
        assert!(text.contains("No disabled"));
        assert!(listed.is_empty());
    }

    #[test]
    fn test_help_mentions_every_command_family() {
        let text = help();
        for needle in ["run", "search", "f+", "off", "on", "import", "export", "delete", "stats"] {
            assert!(text.contains(needle), "help missing {needle}");
        }
    }

    #[test]
    fn test_settings_render() {
        let (_root, manager) = manager_with(&[]);
        let text = settings(&manager);
        assert!(text.contains("show_descriptions = true"));
        assert!(text.contains("max_recent        = 10"));
    }
}
