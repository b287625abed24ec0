//! The tool manager
//!
//! Owns discovery results, per-tool persisted state, search, and tool
//! invocation. Listings are cached in memory with a short TTL; every
//! state-changing operation invalidates the cache and persists the state
//! document immediately.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

use crate::categories::Category;
use crate::registry::archive::{self, ImportOutcome};
use crate::registry::discovery::discover_tools;
use crate::registry::metadata;
use crate::registry::state::{ShellSettings, StateStore};
use crate::types::{LauncherError, Result, ToolKind};

/// Tools pinned to the top of the list, in this order
pub const PRIORITY_TOOLS: &[&str] = &["ssh-manager.py"];

/// Default time-to-live of the cached tool list
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Minimum similarity ratio before a fuzzy search match counts
const FUZZY_THRESHOLD: f32 = 0.5;

/// Exit code reported for a user-interrupted tool
pub const EXIT_INTERRUPTED: i32 = 130;

/// Outcome of an idempotent state mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The mutation changed something and was persisted
    Applied,
    /// The tool was already in the requested state; nothing persisted
    AlreadySet,
}

#[derive(Debug, Clone)]
struct ResolvedMeta {
    display_name: String,
    tags: Vec<String>,
}

#[derive(Debug)]
struct CachedList {
    tools: Vec<String>,
    at: Instant,
}

/// Manages the collection of tools and their persisted state
#[derive(Debug)]
pub struct ToolManager {
    tools_dir: PathBuf,
    exports_dir: PathBuf,
    store: StateStore,
    cache: Option<CachedList>,
    cache_ttl: Duration,
    meta: HashMap<String, ResolvedMeta>,
    kinds: HashMap<String, ToolKind>,
}

impl ToolManager {
    /// Create a manager over a tools directory, persisting state through
    /// the given store.
    pub fn new(tools_dir: impl Into<PathBuf>, store: StateStore) -> Self {
        let tools_dir = tools_dir.into();
        let exports_dir = tools_dir
            .parent()
            .map(|p| p.join("exports"))
            .unwrap_or_else(|| PathBuf::from("exports"));
        Self {
            tools_dir,
            exports_dir,
            store,
            cache: None,
            cache_ttl: CACHE_TTL,
            meta: HashMap::new(),
            kinds: HashMap::new(),
        }
    }

    /// Override the listing cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Tools root this manager scans
    pub fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    /// Shell settings, read-only
    pub fn settings(&self) -> &ShellSettings {
        &self.store.state.settings
    }

    /// Mutate shell settings and persist
    pub fn update_settings(&mut self, f: impl FnOnce(&mut ShellSettings)) -> Result<()> {
        f(&mut self.store.state.settings);
        self.persist()
    }

    /// Favorite tool names, insertion order
    pub fn favorites(&self) -> &[String] {
        &self.store.state.favorites
    }

    /// Recent tool names, most recent first, stale names filtered out
    pub fn recent_tools(&mut self) -> Vec<String> {
        let existing: std::collections::HashSet<String> =
            self.scan().into_iter().collect();
        self.store
            .state
            .recent
            .iter()
            .filter(|t| existing.contains(*t))
            .cloned()
            .collect()
    }

    /// Disabled tool names, stale names filtered out, alphabetical
    pub fn disabled_tools(&mut self) -> Vec<String> {
        let existing: std::collections::HashSet<String> =
            self.scan().into_iter().collect();
        let mut disabled: Vec<String> = self
            .store
            .state
            .disabled_tools
            .iter()
            .filter(|t| existing.contains(*t))
            .cloned()
            .collect();
        disabled.sort();
        disabled
    }

    /// Whether a tool is currently active (not disabled)
    pub fn is_active(&self, tool: &str) -> bool {
        !self.store.state.disabled_tools.iter().any(|t| t == tool)
    }

    /// Whether a tool is favorited
    pub fn is_favorite(&self, tool: &str) -> bool {
        self.store.state.favorites.iter().any(|t| t == tool)
    }

    /// Total recorded invocations across all tools
    pub fn total_usage(&self) -> u64 {
        self.store.state.statistics.tool_usage.values().sum()
    }

    /// Per-tool usage rows `(tool, count, last_used)` sorted by count
    /// descending
    pub fn usage_stats(&self) -> Vec<(String, u64, Option<f64>)> {
        let stats = &self.store.state.statistics;
        let mut rows: Vec<(String, u64, Option<f64>)> = stats
            .tool_usage
            .iter()
            .map(|(tool, count)| (tool.clone(), *count, stats.last_used.get(tool).copied()))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }

    // === Listing ===

    /// Active tools in display order: priority tools first (in declared
    /// order), then the rest alphabetically. Cached with a TTL;
    /// `force_refresh` bypasses the cache.
    pub fn tool_list(&mut self, force_refresh: bool) -> Vec<String> {
        if !force_refresh {
            if let Some(cached) = &self.cache {
                if cached.at.elapsed() < self.cache_ttl {
                    return cached.tools.clone();
                }
            }
        }

        let sorted = Self::sort_and_prioritize(self.scan());
        let active: Vec<String> = sorted
            .into_iter()
            .filter(|t| self.is_active(t))
            .collect();

        self.cache = Some(CachedList {
            tools: active.clone(),
            at: Instant::now(),
        });
        active
    }

    /// All tools including disabled ones, same ordering, never cached
    pub fn all_tools(&mut self) -> Vec<String> {
        Self::sort_and_prioritize(self.scan())
    }

    fn scan(&self) -> Vec<String> {
        discover_tools(&self.tools_dir)
    }

    fn sort_and_prioritize(tools: Vec<String>) -> Vec<String> {
        let mut priority: Vec<String> = Vec::new();
        let mut regular: Vec<String> = Vec::new();
        for tool in tools {
            if PRIORITY_TOOLS.contains(&tool.as_str()) {
                priority.push(tool);
            } else {
                regular.push(tool);
            }
        }
        priority.sort_by_key(|t| {
            PRIORITY_TOOLS
                .iter()
                .position(|p| *p == t.as_str())
                .unwrap_or(usize::MAX)
        });
        regular.sort();
        priority.extend(regular);
        priority
    }

    fn invalidate_cache(&mut self) {
        self.cache = None;
    }

    fn persist(&mut self) -> Result<()> {
        self.invalidate_cache();
        self.store.save()
    }

    // === Metadata ===

    /// Display name without the kind marker
    pub fn display_name(&mut self, tool: &str) -> String {
        self.resolve_meta(tool).display_name
    }

    /// Display name prefixed with the `[PY]`/`[SH]` kind marker
    pub fn labeled_display_name(&mut self, tool: &str) -> String {
        let kind = self.tool_kind(tool);
        let name = self.display_name(tool);
        format!("[{}] {}", kind.label(), name)
    }

    /// Search/classification tags for a tool
    pub fn tags(&mut self, tool: &str) -> Vec<String> {
        self.resolve_meta(tool).tags
    }

    fn resolve_meta(&mut self, tool: &str) -> ResolvedMeta {
        if let Some(meta) = self.meta.get(tool) {
            return meta.clone();
        }
        let from_file = self
            .tool_dir_of(tool)
            .and_then(|(dir, _)| metadata::load_metadata(&dir));
        let resolved = ResolvedMeta {
            display_name: from_file
                .as_ref()
                .and_then(|m| m.name.clone())
                .unwrap_or_else(|| metadata::generate_display_name(tool)),
            tags: match from_file {
                Some(m) if !m.tags.is_empty() => m.tags,
                _ => metadata::generate_tags(tool),
            },
        };
        self.meta.insert(tool.to_string(), resolved.clone());
        resolved
    }

    /// Category for a tool: the persisted manual override wins, otherwise
    /// the keyword classifier decides.
    pub fn category_of(&mut self, tool: &str) -> Category {
        if let Some(cat) = self.store.state.manual_categories.get(tool) {
            return *cat;
        }
        let tags = self.tags(tool);
        Category::classify(tool, &tags)
    }

    /// Pin a tool to a category, overriding the classifier
    pub fn set_manual_category(&mut self, tool: &str, category: Category) -> Result<()> {
        self.store
            .state
            .manual_categories
            .insert(tool.to_string(), category);
        self.persist()
    }

    /// Execution kind, resolved from which layout the tool lives in
    pub fn tool_kind(&mut self, tool: &str) -> ToolKind {
        if let Some(kind) = self.kinds.get(tool) {
            return *kind;
        }
        let kind = self
            .tool_dir_of(tool)
            .map(|(_, kind)| kind)
            .unwrap_or_default();
        self.kinds.insert(tool.to_string(), kind);
        kind
    }

    /// Tool directory and kind, probing py -> sh -> legacy layouts
    pub fn tool_dir_of(&self, tool: &str) -> Option<(PathBuf, ToolKind)> {
        let stem = metadata::tool_stem(tool);
        for kind in [ToolKind::Standard, ToolKind::ShellWrapped] {
            let dir = self.tools_dir.join(kind.dir_name()).join(stem);
            if dir.join(tool).is_file() {
                return Some((dir, kind));
            }
        }
        let legacy = self.tools_dir.join(stem);
        if legacy.join(tool).is_file() {
            return Some((legacy, ToolKind::Standard));
        }
        None
    }

    /// Path to the tool's main file, probing py -> sh -> legacy dir ->
    /// legacy flat layouts
    pub fn find_tool_path(&self, tool: &str) -> Option<PathBuf> {
        if let Some((dir, _)) = self.tool_dir_of(tool) {
            return Some(dir.join(tool));
        }
        let flat = self.tools_dir.join(tool);
        flat.is_file().then_some(flat)
    }

    /// Help text for a tool, when its directory ships a doc file
    pub fn tool_help(&mut self, tool: &str) -> Option<String> {
        let (dir, _) = self.tool_dir_of(tool)?;
        metadata::load_help(&dir)
    }

    // === Search ===

    /// Search active tools, ranked by relevance descending.
    ///
    /// An empty query yields no results. Exact/prefix/substring matches on
    /// the name outweigh display-name matches, which outweigh tag matches;
    /// fuzzy similarity is the lowest-weight fallback and only applies
    /// when nothing matched directly. Ties keep list order (stable sort).
    pub fn search(&mut self, query: &str, fuzzy: bool) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(String, f32)> = Vec::new();
        for tool in self.tool_list(false) {
            let mut score = 0.0f32;
            let mut matched = false;

            let tool_lower = tool.to_lowercase();
            if tool_lower.contains(&query) {
                score = if tool_lower == query {
                    1.0
                } else if tool_lower.starts_with(&query) {
                    0.9
                } else {
                    0.7
                };
                matched = true;
            }

            let display = self.display_name(&tool).to_lowercase();
            if display.contains(&query) {
                let display_score = if display.starts_with(&query) { 0.8 } else { 0.6 };
                score = score.max(display_score);
                matched = true;
            }

            if self
                .tags(&tool)
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
            {
                score = score.max(0.5);
                matched = true;
            }

            if fuzzy && !matched {
                let name_ratio = similarity(&query, &tool_lower);
                if name_ratio > FUZZY_THRESHOLD {
                    score = name_ratio * 0.4;
                    matched = true;
                }
                let display_ratio = similarity(&query, &display);
                if display_ratio > FUZZY_THRESHOLD {
                    score = score.max(display_ratio * 0.3);
                    matched = true;
                }
            }

            if matched {
                scored.push((tool, score));
            }
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(tool, _)| tool).collect()
    }

    // === Favorites / disabled ===

    /// Add a tool to favorites. Idempotent.
    pub fn add_favorite(&mut self, tool: &str) -> Result<StateChange> {
        if self.is_favorite(tool) {
            return Ok(StateChange::AlreadySet);
        }
        self.store.state.favorites.push(tool.to_string());
        self.persist()?;
        Ok(StateChange::Applied)
    }

    /// Remove a tool from favorites. Idempotent.
    pub fn remove_favorite(&mut self, tool: &str) -> Result<StateChange> {
        let before = self.store.state.favorites.len();
        self.store.state.favorites.retain(|t| t != tool);
        if self.store.state.favorites.len() == before {
            return Ok(StateChange::AlreadySet);
        }
        self.persist()?;
        Ok(StateChange::Applied)
    }

    /// Re-enable a disabled tool. Idempotent.
    pub fn activate(&mut self, tool: &str) -> Result<StateChange> {
        let before = self.store.state.disabled_tools.len();
        self.store.state.disabled_tools.retain(|t| t != tool);
        if self.store.state.disabled_tools.len() == before {
            return Ok(StateChange::AlreadySet);
        }
        self.persist()?;
        Ok(StateChange::Applied)
    }

    /// Disable a tool. Also evicts it from favorites and recent: a
    /// disabled tool may not stay favorited or reachable through the
    /// recent list.
    pub fn deactivate(&mut self, tool: &str) -> Result<StateChange> {
        if !self.is_active(tool) {
            return Ok(StateChange::AlreadySet);
        }
        self.store.state.disabled_tools.push(tool.to_string());
        self.store.state.favorites.retain(|t| t != tool);
        self.store.state.recent.retain(|t| t != tool);
        self.persist()?;
        Ok(StateChange::Applied)
    }

    // === Recent / statistics ===

    /// Record a tool run: move-to-front in recent, prune names no longer
    /// on disk, truncate to `max_recent`, bump the usage counter, stamp
    /// last-used, persist.
    pub fn record_run(&mut self, tool: &str) -> Result<()> {
        let state = &mut self.store.state;
        state.recent.retain(|t| t != tool);
        state.recent.insert(0, tool.to_string());

        let existing: std::collections::HashSet<String> =
            discover_tools(&self.tools_dir).into_iter().collect();
        state.recent.retain(|t| existing.contains(t));

        let max_recent = state.settings.max_recent;
        state.recent.truncate(max_recent);

        *state.statistics.tool_usage.entry(tool.to_string()).or_insert(0) += 1;
        state
            .statistics
            .last_used
            .insert(tool.to_string(), chrono::Utc::now().timestamp() as f64);

        self.persist()
    }

    // === Invocation ===

    /// Run a tool as a child process with inherited stdio and return its
    /// exit code.
    ///
    /// A non-zero exit code is logged but returned as-is; only failure to
    /// locate or spawn the tool is an error. A child killed by SIGINT
    /// reports 130 and is not recorded in the recent list, leaving the
    /// persisted state untouched by the interruption.
    pub fn run_tool(&mut self, tool: &str) -> Result<i32> {
        let path = self
            .find_tool_path(tool)
            .ok_or_else(|| LauncherError::tool_not_found(tool))?;
        let kind = self.tool_kind(tool);

        let mut cmd = match kind {
            ToolKind::ShellWrapped => {
                let app_sh = path.parent().map(|p| p.join("app.sh"));
                match app_sh.filter(|p| p.is_file()) {
                    Some(script) => {
                        let mut c = Command::new("bash");
                        c.arg(script);
                        c
                    }
                    None => {
                        let mut c = Command::new("python");
                        c.arg(&path);
                        c
                    }
                }
            }
            ToolKind::Standard => {
                let mut c = Command::new("python");
                c.arg(&path);
                c
            }
        };

        tracing::debug!(tool, path = %path.display(), "running tool");
        let status = cmd.status().map_err(|source| LauncherError::SpawnFailed {
            tool: tool.to_string(),
            source,
        })?;
        let code = exit_code(&status);

        if code == EXIT_INTERRUPTED {
            tracing::warn!(tool, "tool interrupted by user");
            return Ok(code);
        }
        if code != 0 {
            tracing::error!(tool, code, "tool exited with failure");
        }
        self.record_run(tool)?;
        Ok(code)
    }

    // === Export / import / delete ===

    /// Package a tool's directory into a zip archive under the exports
    /// directory. Failures are logged and reported as `None`, never
    /// raised to the caller.
    pub fn export_tool(&mut self, tool: &str) -> Option<PathBuf> {
        let (dir, kind) = match self.tool_dir_of(tool) {
            Some(found) => found,
            None => {
                tracing::error!(tool, "export failed: tool directory not found");
                return None;
            }
        };
        match archive::export_tool_dir(&dir, kind, &self.exports_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(tool, error = %e, "export failed");
                None
            }
        }
    }

    /// Import a tool from a zip archive or a directory.
    ///
    /// Returns [`ImportOutcome::Exists`] when a tool of the same identity
    /// is already installed and `overwrite` is false; the caller decides
    /// whether to confirm and retry with `overwrite = true`.
    pub fn import_tool(&mut self, source: &Path, overwrite: bool) -> Result<ImportOutcome> {
        let outcome = archive::import_tool(&self.tools_dir, source, overwrite)?;
        if let ImportOutcome::Imported(tool) = &outcome {
            tracing::info!(tool, "imported tool");
            self.meta.remove(tool);
            self.kinds.remove(tool);
            self.invalidate_cache();
        }
        Ok(outcome)
    }

    /// Delete a tool's directory and purge its name from favorites,
    /// recent, and disabled.
    pub fn delete_tool(&mut self, tool: &str) -> Result<()> {
        let (dir, _) = self
            .tool_dir_of(tool)
            .ok_or_else(|| LauncherError::tool_dir_missing(tool))?;
        std::fs::remove_dir_all(&dir)?;

        let state = &mut self.store.state;
        state.favorites.retain(|t| t != tool);
        state.recent.retain(|t| t != tool);
        state.disabled_tools.retain(|t| t != tool);
        self.meta.remove(tool);
        self.kinds.remove(tool);
        self.persist()?;
        tracing::info!(tool, "deleted tool");
        Ok(())
    }
}

/// Character-level similarity ratio in `0.0..=1.0`
fn similarity(a: &str, b: &str) -> f32 {
    similar::TextDiff::from_chars(a, b).ratio()
}

/// Map an exit status to a process exit code. A signal-terminated child
/// reports `128 + signal`, which makes SIGINT come out as 130.
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::state::STATE_FILE_NAME;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        manager: ToolManager,
        tools_dir: PathBuf,
    }

    fn fixture(tools: &[&str]) -> Fixture {
        let root = TempDir::new().unwrap();
        let tools_dir = root.path().join("tools");
        for tool in tools {
            make_tool(&tools_dir, "py", tool);
        }
        let store = StateStore::open(root.path().join(STATE_FILE_NAME));
        let manager = ToolManager::new(&tools_dir, store);
        Fixture {
            _root: root,
            manager,
            tools_dir,
        }
    }

    fn make_tool(tools_dir: &Path, kind: &str, stem: &str) {
        let dir = tools_dir.join(kind).join(stem);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{stem}.py")), "print('ok')\n").unwrap();
    }

    #[test]
    fn test_priority_then_alphabetical() {
        let mut fx = fixture(&["zz-last", "aa-first", "ssh-manager"]);
        let tools = fx.manager.tool_list(true);
        assert_eq!(
            tools,
            vec!["ssh-manager.py", "aa-first.py", "zz-last.py"]
        );
    }

    #[test]
    fn test_cache_returns_identical_until_invalidated() {
        let mut fx = fixture(&["aa-first", "bb-second"]);
        let first = fx.manager.tool_list(false);
        // New tool appears on disk, but the cache still answers
        make_tool(&fx.tools_dir, "py", "cc-new");
        assert_eq!(fx.manager.tool_list(false), first);
        // force_refresh sees it
        let refreshed = fx.manager.tool_list(true);
        assert!(refreshed.contains(&"cc-new.py".to_string()));
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut fx = fixture(&["aa-first", "bb-second"]);
        let _ = fx.manager.tool_list(false);
        fx.manager.deactivate("aa-first.py").unwrap();
        let tools = fx.manager.tool_list(false);
        assert_eq!(tools, vec!["bb-second.py"]);
    }

    #[test]
    fn test_disabled_tools_are_invisible() {
        let mut fx = fixture(&["aa-first", "bb-second"]);
        fx.manager.deactivate("bb-second.py").unwrap();
        assert!(!fx.manager.tool_list(true).contains(&"bb-second.py".to_string()));
        // but still present in the full listing
        assert!(fx.manager.all_tools().contains(&"bb-second.py".to_string()));
    }

    #[test]
    fn test_deactivate_evicts_favorite_and_recent() {
        let mut fx = fixture(&["aa-first"]);
        fx.manager.add_favorite("aa-first.py").unwrap();
        fx.manager.record_run("aa-first.py").unwrap();
        assert!(fx.manager.is_favorite("aa-first.py"));

        fx.manager.deactivate("aa-first.py").unwrap();
        assert!(!fx.manager.is_favorite("aa-first.py"));
        assert!(fx.manager.recent_tools().is_empty());
    }

    #[test]
    fn test_favorites_idempotent() {
        let mut fx = fixture(&["aa-first"]);
        assert_eq!(
            fx.manager.add_favorite("aa-first.py").unwrap(),
            StateChange::Applied
        );
        assert_eq!(
            fx.manager.add_favorite("aa-first.py").unwrap(),
            StateChange::AlreadySet
        );
        assert_eq!(
            fx.manager.remove_favorite("aa-first.py").unwrap(),
            StateChange::Applied
        );
        assert_eq!(
            fx.manager.remove_favorite("aa-first.py").unwrap(),
            StateChange::AlreadySet
        );
    }

    #[test]
    fn test_recent_move_to_front_and_bound() {
        let mut fx = fixture(&["aa", "bb", "cc"]);
        fx.manager
            .update_settings(|s| s.max_recent = 2)
            .unwrap();

        fx.manager.record_run("aa.py").unwrap();
        fx.manager.record_run("bb.py").unwrap();
        fx.manager.record_run("cc.py").unwrap();
        assert_eq!(fx.manager.recent_tools(), vec!["cc.py", "bb.py"]);

        // Repeated runs move to front without duplicating
        fx.manager.record_run("bb.py").unwrap();
        fx.manager.record_run("bb.py").unwrap();
        assert_eq!(fx.manager.recent_tools(), vec!["bb.py", "cc.py"]);
    }

    #[test]
    fn test_recent_prunes_deleted_tools() {
        let mut fx = fixture(&["aa", "bb"]);
        fx.manager.record_run("aa.py").unwrap();
        fx.manager.record_run("bb.py").unwrap();

        std::fs::remove_dir_all(fx.tools_dir.join("py").join("aa")).unwrap();
        // Next record prunes the vanished tool from the stored list
        fx.manager.record_run("bb.py").unwrap();
        assert_eq!(fx.manager.recent_tools(), vec!["bb.py"]);
    }

    #[test]
    fn test_usage_statistics_accumulate() {
        let mut fx = fixture(&["aa"]);
        fx.manager.record_run("aa.py").unwrap();
        fx.manager.record_run("aa.py").unwrap();
        let rows = fx.manager.usage_stats();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "aa.py");
        assert_eq!(rows[0].1, 2);
        assert!(rows[0].2.is_some());
        assert_eq!(fx.manager.total_usage(), 2);
    }

    #[test]
    fn test_search_empty_query_is_empty() {
        let mut fx = fixture(&["backup-folder"]);
        assert!(fx.manager.search("", true).is_empty());
        assert!(fx.manager.search("   ", true).is_empty());
    }

    #[test]
    fn test_search_exact_name_ranks_first() {
        let mut fx = fixture(&["backup-folder", "backup-folder-extra", "clean-temp"]);
        let results = fx.manager.search("backup-folder.py", true);
        assert_eq!(results[0], "backup-folder.py");
    }

    #[test]
    fn test_search_matches_tags() {
        // "remote" is a generated tag of ssh tools, not part of the name
        let mut fx = fixture(&["ssh-manager", "clean-temp"]);
        let results = fx.manager.search("remote", true);
        assert_eq!(results, vec!["ssh-manager.py"]);
    }

    #[test]
    fn test_search_fuzzy_fallback() {
        let mut fx = fixture(&["backup-folder"]);
        // Close misspelling, no direct substring anywhere
        let results = fx.manager.search("bakup-folde", true);
        assert_eq!(results, vec!["backup-folder.py"]);
        // Fuzzy disabled: nothing matches
        assert!(fx.manager.search("bakup-folde", false).is_empty());
    }

    #[test]
    fn test_metadata_file_overrides_generated() {
        let mut fx = fixture(&["backup-folder"]);
        let dir = fx.tools_dir.join("py").join("backup-folder");
        std::fs::write(
            dir.join("tool_info.json"),
            r#"{"name": "Folder Saver", "tags": ["safety"]}"#,
        )
        .unwrap();

        assert_eq!(fx.manager.display_name("backup-folder.py"), "Folder Saver");
        assert_eq!(
            fx.manager.labeled_display_name("backup-folder.py"),
            "[PY] Folder Saver"
        );
        assert_eq!(fx.manager.tags("backup-folder.py"), vec!["safety"]);
    }

    #[test]
    fn test_manual_category_overrides_classifier() {
        let mut fx = fixture(&["backup-folder"]);
        assert_eq!(fx.manager.category_of("backup-folder.py"), Category::File);
        fx.manager
            .set_manual_category("backup-folder.py", Category::Network)
            .unwrap();
        assert_eq!(
            fx.manager.category_of("backup-folder.py"),
            Category::Network
        );
    }

    #[test]
    fn test_delete_purges_everywhere() {
        let mut fx = fixture(&["aa", "bb"]);
        fx.manager.add_favorite("aa.py").unwrap();
        fx.manager.record_run("aa.py").unwrap();

        fx.manager.delete_tool("aa.py").unwrap();
        assert!(!fx.manager.is_favorite("aa.py"));
        assert!(fx.manager.recent_tools().is_empty());
        assert_eq!(fx.manager.tool_list(true), vec!["bb.py"]);
        assert!(fx.manager.find_tool_path("aa.py").is_none());
    }

    #[test]
    fn test_run_tool_not_found() {
        let mut fx = fixture(&[]);
        let err = fx.manager.run_tool("ghost.py").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_tool_path_lookup_order() {
        let root = TempDir::new().unwrap();
        let tools_dir = root.path().join("tools");
        // Same stem in sh/ and as a legacy flat file; py/ wins, then sh/
        make_tool(&tools_dir, "sh", "dual");
        std::fs::write(tools_dir.join("dual.py"), "").unwrap();

        let store = StateStore::open(root.path().join(STATE_FILE_NAME));
        let manager = ToolManager::new(&tools_dir, store);
        let path = manager.find_tool_path("dual.py").unwrap();
        assert!(path.ends_with(Path::new("sh").join("dual").join("dual.py")));
    }
}
