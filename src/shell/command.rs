//! Shell command grammar
//!
//! Input lines parse into a [`Command`]. The grammar is forgiving about
//! spacing (`f+3` and `f+ 3` are the same command, `r2` and `r 2` too)
//! and index lists accept both commas and spaces. Indices are 1-based as
//! displayed; conversion to zero-based happens at dispatch.

/// One parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the tool at a displayed index
    Run(usize),
    /// Show help text for the tool at a displayed index (`3h`)
    ToolHelp(usize),
    /// Re-render the menu
    List,
    /// Search active tools
    Search(String),
    /// List favorites
    Favorites,
    /// Add the tool at a displayed index to favorites
    FavoriteAdd(usize),
    /// Remove the tool at a displayed index from favorites
    FavoriteRemove(usize),
    /// List recent tools
    Recent,
    /// Run the Nth most recent tool
    RunRecent(usize),
    /// Re-enable tools by index into the disabled list
    Activate(Vec<usize>),
    /// Disable tools by index into the displayed active list
    Deactivate(Vec<usize>),
    /// List disabled tools
    Disabled,
    /// Show usage statistics
    Stats,
    /// Show current settings
    Settings,
    /// Change a setting
    Set { key: String, value: String },
    /// Pin the tool at a displayed index to a category
    SetCategory { index: usize, key: String },
    /// Export the tool at a displayed index
    Export(usize),
    /// Import a tool from a zip archive or directory
    Import(String),
    /// Delete the tool at a displayed index
    Delete(usize),
    /// Show the help screen
    Help,
    /// Leave the shell
    Quit,
    /// Anything else; holds the raw input for suggestions
    Unknown(String),
}

/// Parse a comma- or space-separated list of 1-based indices. Returns
/// `None` when any piece fails to parse or the list is empty.
pub fn parse_indices(input: &str) -> Option<Vec<usize>> {
    let pieces: Vec<&str> = input
        .split([',', ' '])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if pieces.is_empty() {
        return None;
    }
    pieces.iter().map(|p| p.parse::<usize>().ok()).collect()
}

/// Parse one line of input. Never fails: unrecognized input becomes
/// [`Command::Unknown`].
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::List;
    }
    let lower = line.to_lowercase();

    // Bare number runs a tool; 0 quits like the menu footer says
    if let Ok(n) = lower.parse::<usize>() {
        return if n == 0 { Command::Quit } else { Command::Run(n) };
    }

    // "3h" asks for a tool's help text
    if let Some(num) = lower.strip_suffix('h') {
        if let Ok(n) = num.parse::<usize>() {
            return Command::ToolHelp(n);
        }
    }

    // "/query" is shorthand for search
    if let Some(query) = line.strip_prefix('/') {
        return Command::Search(query.trim().to_string());
    }

    let (head_raw, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let head = head_raw.to_lowercase();

    match head.as_str() {
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" | "?" => Command::Help,
        "l" | "list" | "ls" => Command::List,
        "s" | "search" => Command::Search(rest.to_string()),
        "f" | "fav" | "favorites" if rest.is_empty() => Command::Favorites,
        "recent" => Command::Recent,
        "disabled" => Command::Disabled,
        "stats" => Command::Stats,
        "on" => match parse_indices(rest) {
            Some(indices) => Command::Activate(indices),
            None => Command::Unknown(line.to_string()),
        },
        "off" => match parse_indices(rest) {
            Some(indices) => Command::Deactivate(indices),
            None => Command::Unknown(line.to_string()),
        },
        "set" => {
            if rest.is_empty() {
                Command::Settings
            } else {
                match rest.split_once(char::is_whitespace) {
                    Some((key, value)) => Command::Set {
                        key: key.to_lowercase(),
                        value: value.trim().to_string(),
                    },
                    None => Command::Unknown(line.to_string()),
                }
            }
        }
        "cat" | "category" => match rest.split_once(char::is_whitespace) {
            Some((index, key)) => match index.parse::<usize>() {
                Ok(index) => Command::SetCategory {
                    index,
                    key: key.trim().to_lowercase(),
                },
                Err(_) => Command::Unknown(line.to_string()),
            },
            None => Command::Unknown(line.to_string()),
        },
        "export" => match rest.parse::<usize>() {
            Ok(n) => Command::Export(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "import" => {
            if rest.is_empty() {
                Command::Unknown(line.to_string())
            } else {
                Command::Import(rest.to_string())
            }
        }
        "delete" | "del" => match rest.parse::<usize>() {
            Ok(n) => Command::Delete(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        _ => parse_compact(&lower, line),
    }
}

/// Handle the no-space forms: `f+3`, `f-3`, `f+ 3`, `r2`, `r 2`, bare `r`.
fn parse_compact(lower: &str, raw: &str) -> Command {
    if lower == "r" {
        return Command::Recent;
    }
    if let Some(rest) = lower.strip_prefix("f+") {
        if let Ok(n) = rest.trim().parse::<usize>() {
            return Command::FavoriteAdd(n);
        }
    }
    if let Some(rest) = lower.strip_prefix("f-") {
        if let Ok(n) = rest.trim().parse::<usize>() {
            return Command::FavoriteRemove(n);
        }
    }
    if let Some(rest) = lower.strip_prefix('r') {
        if let Ok(n) = rest.trim().parse::<usize>() {
            return Command::RunRecent(n);
        }
    }
    Command::Unknown(raw.to_string())
}

const KNOWN_COMMANDS: &[&str] = &[
    "list", "search", "favorites", "recent", "disabled", "stats", "set", "cat", "export",
    "import", "delete", "help", "quit", "on", "off",
];

/// Suggest the closest known commands for a typo, best match first.
pub fn suggest(input: &str) -> Vec<&'static str> {
    let word = input
        .split_whitespace()
        .next()
        .unwrap_or(input)
        .to_lowercase();
    let mut scored: Vec<(&'static str, f32)> = KNOWN_COMMANDS
        .iter()
        .map(|cmd| (*cmd, similar::TextDiff::from_chars(word.as_str(), *cmd).ratio()))
        .filter(|(_, ratio)| *ratio > 0.5)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(3).map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbers_run_and_zero_quits() {
        assert_eq!(parse("3"), Command::Run(3));
        assert_eq!(parse(" 12 "), Command::Run(12));
        assert_eq!(parse("0"), Command::Quit);
    }

    #[test]
    fn test_number_h_is_tool_help() {
        assert_eq!(parse("3h"), Command::ToolHelp(3));
        assert_eq!(parse("h"), Command::Help);
    }

    #[test]
    fn test_search_forms() {
        assert_eq!(parse("s backup"), Command::Search("backup".into()));
        assert_eq!(parse("search ssh keys"), Command::Search("ssh keys".into()));
        assert_eq!(parse("/qr"), Command::Search("qr".into()));
        assert_eq!(parse("s"), Command::Search(String::new()));
    }

    #[test]
    fn test_favorite_forms_with_and_without_space() {
        assert_eq!(parse("f"), Command::Favorites);
        assert_eq!(parse("f+3"), Command::FavoriteAdd(3));
        assert_eq!(parse("f+ 3"), Command::FavoriteAdd(3));
        assert_eq!(parse("f-2"), Command::FavoriteRemove(2));
        assert_eq!(parse("f- 2"), Command::FavoriteRemove(2));
    }

    #[test]
    fn test_recent_forms() {
        assert_eq!(parse("r"), Command::Recent);
        assert_eq!(parse("recent"), Command::Recent);
        assert_eq!(parse("r2"), Command::RunRecent(2));
        assert_eq!(parse("r 2"), Command::RunRecent(2));
    }

    #[test]
    fn test_on_off_index_lists() {
        assert_eq!(parse("on 1"), Command::Activate(vec![1]));
        assert_eq!(parse("on 1,2,3"), Command::Activate(vec![1, 2, 3]));
        assert_eq!(parse("off 2 4"), Command::Deactivate(vec![2, 4]));
        assert_eq!(parse("off 1, 3"), Command::Deactivate(vec![1, 3]));
        // Missing or malformed indices are not silently ignored
        assert_eq!(parse("on"), Command::Unknown("on".into()));
        assert_eq!(parse("off x"), Command::Unknown("off x".into()));
    }

    #[test]
    fn test_settings_forms() {
        assert_eq!(parse("set"), Command::Settings);
        assert_eq!(
            parse("set max_recent 20"),
            Command::Set {
                key: "max_recent".into(),
                value: "20".into()
            }
        );
        assert_eq!(
            parse("set show_descriptions false"),
            Command::Set {
                key: "show_descriptions".into(),
                value: "false".into()
            }
        );
    }

    #[test]
    fn test_category_form() {
        assert_eq!(
            parse("cat 3 media"),
            Command::SetCategory {
                index: 3,
                key: "media".into()
            }
        );
        assert_eq!(
            parse("category 1 network"),
            Command::SetCategory {
                index: 1,
                key: "network".into()
            }
        );
        assert_eq!(parse("cat 3"), Command::Unknown("cat 3".into()));
    }

    #[test]
    fn test_tool_management_forms() {
        assert_eq!(parse("export 4"), Command::Export(4));
        assert_eq!(parse("import /tmp/tool.zip"), Command::Import("/tmp/tool.zip".into()));
        assert_eq!(parse("delete 2"), Command::Delete(2));
        assert_eq!(parse("del 2"), Command::Delete(2));
        assert_eq!(parse("export"), Command::Unknown("export".into()));
        assert_eq!(parse("import"), Command::Unknown("import".into()));
    }

    #[test]
    fn test_misc_forms() {
        assert_eq!(parse(""), Command::List);
        assert_eq!(parse("l"), Command::List);
        assert_eq!(parse("?"), Command::Help);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse("QUIT"), Command::Quit);
        assert_eq!(parse("stats"), Command::Stats);
        assert_eq!(parse("disabled"), Command::Disabled);
    }

    #[test]
    fn test_unknown_keeps_raw_input() {
        assert_eq!(parse("frobnicate"), Command::Unknown("frobnicate".into()));
    }

    #[test]
    fn test_indices_parser() {
        assert_eq!(parse_indices("1,2,3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_indices("1 2 3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_indices("1, 2"), Some(vec![1, 2]));
        assert_eq!(parse_indices(""), None);
        assert_eq!(parse_indices("1,x"), None);
    }

    #[test]
    fn test_suggestions_for_typos() {
        assert!(suggest("serach").contains(&"search"));
        assert!(suggest("improt foo.zip").contains(&"import"));
        assert!(suggest("zzzz").is_empty());
    }
}
