//! Interactive shell
//!
//! A blocking REPL over a [`ToolManager`]. Every dispatch failure is
//! printed and swallowed; nothing short of stdin closing or an explicit
//! quit ends the loop. Ctrl+C sets a flag through the `ctrlc` handler and
//! falls back to the prompt instead of killing the shell, so an
//! interrupted child tool returns the user to the menu.

pub mod command;
pub mod render;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::categories::Category;
use crate::registry::{ImportOutcome, StateChange, ToolManager, EXIT_INTERRUPTED};
use crate::types::Result;

pub use command::Command;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide SIGINT handler. Safe to call once per
/// process; a second call fails inside `ctrlc` and is reported as a
/// warning only.
pub fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
    });
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }
}

/// Consume the interrupt flag, returning whether it was set
fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// The interactive shell
pub struct Shell {
    manager: ToolManager,
    /// Tools in the order currently on screen; numeric commands are
    /// 1-based indices into this list
    displayed: Vec<String>,
}

impl Shell {
    pub fn new(manager: ToolManager) -> Self {
        Self {
            manager,
            displayed: Vec::new(),
        }
    }

    /// Run the REPL until quit or EOF.
    pub fn run(&mut self) -> Result<()> {
        install_interrupt_handler();
        self.show_menu();

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    take_interrupt();
                    println!();
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
            if take_interrupt() {
                println!();
                continue;
            }

            match command::parse(&line) {
                Command::Quit => break,
                cmd => self.dispatch(cmd),
            }
        }
        println!("Bye.");
        Ok(())
    }

    fn show_menu(&mut self) {
        let (text, order) = render::menu(&mut self.manager);
        self.displayed = order;
        print!("{text}");
    }

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Run(n) => self.run_tool_at(n),
            Command::ToolHelp(n) => self.show_tool_help(n),
            Command::List => self.show_menu(),
            Command::Search(query) => self.search(&query),
            Command::Favorites => print!("{}", render::favorites(&mut self.manager)),
            Command::FavoriteAdd(n) => self.favorite(n, true),
            Command::FavoriteRemove(n) => self.favorite(n, false),
            Command::Recent => print!("{}", render::recent(&mut self.manager)),
            Command::RunRecent(n) => self.run_recent(n),
            Command::Activate(indices) => self.activate(&indices),
            Command::Deactivate(indices) => self.deactivate(&indices),
            Command::Disabled => {
                let (text, _) = render::disabled(&mut self.manager);
                print!("{text}");
            }
            Command::Stats => print!("{}", render::stats(&mut self.manager)),
            Command::Settings => print!("{}", render::settings(&self.manager)),
            Command::Set { key, value } => self.set(&key, &value),
            Command::SetCategory { index, key } => self.set_category(index, &key),
            Command::Export(n) => self.export(n),
            Command::Import(path) => self.import(&path),
            Command::Delete(n) => self.delete(n),
            Command::Help => print!("{}", render::help()),
            Command::Quit => {}
            Command::Unknown(input) => {
                let suggestions = command::suggest(&input);
                if suggestions.is_empty() {
                    println!("Unknown command '{input}'. Type h for help.");
                } else {
                    println!(
                        "Unknown command '{input}'. Did you mean: {}?",
                        suggestions.join(", ")
                    );
                }
            }
        }
    }

    /// Resolve a displayed 1-based index to a tool name
    fn tool_at(&self, n: usize) -> Option<String> {
        if n == 0 || n > self.displayed.len() {
            println!(
                "No tool number {n}. Pick 1-{} or type l to list.",
                self.displayed.len()
            );
            return None;
        }
        Some(self.displayed[n - 1].clone())
    }

    fn run_tool_at(&mut self, n: usize) {
        let Some(tool) = self.tool_at(n) else { return };
        self.run_named(&tool);
    }

    fn run_recent(&mut self, n: usize) {
        let recent = self.manager.recent_tools();
        if n == 0 || n > recent.len() {
            println!("No recent tool number {n}.");
            return;
        }
        let tool = recent[n - 1].clone();
        self.run_named(&tool);
    }

    fn run_named(&mut self, tool: &str) {
        println!("Running {}...", self.manager.display_name(tool));
        match self.manager.run_tool(tool) {
            Ok(0) => {}
            Ok(EXIT_INTERRUPTED) => {
                take_interrupt();
                println!("Interrupted.");
            }
            Ok(code) => println!("Tool exited with code {code}."),
            Err(e) => println!("Error: {e}"),
        }
        self.show_menu();
    }

    fn show_tool_help(&mut self, n: usize) {
        let Some(tool) = self.tool_at(n) else { return };
        match self.manager.tool_help(&tool) {
            Some(text) => println!("{}", text.trim_end()),
            None => println!("No help available for {}.", self.manager.display_name(&tool)),
        }
    }

    fn search(&mut self, query: &str) {
        let hits = self.manager.search(query, true);
        print!("{}", render::search_results(&mut self.manager, query, &hits));
        if !hits.is_empty() {
            // Numeric commands now address the result list
            self.displayed = hits;
        }
    }

    fn favorite(&mut self, n: usize, add: bool) {
        let Some(tool) = self.tool_at(n) else { return };
        let name = self.manager.display_name(&tool);
        let outcome = if add {
            self.manager.add_favorite(&tool)
        } else {
            self.manager.remove_favorite(&tool)
        };
        match outcome {
            Ok(StateChange::Applied) if add => println!("Added {name} to favorites."),
            Ok(StateChange::Applied) => println!("Removed {name} from favorites."),
            Ok(StateChange::AlreadySet) if add => println!("{name} is already a favorite."),
            Ok(StateChange::AlreadySet) => println!("{name} is not a favorite."),
            Err(e) => println!("Error: {e}"),
        }
    }

    fn activate(&mut self, indices: &[usize]) {
        let disabled = self.manager.disabled_tools();
        for &n in indices {
            if n == 0 || n > disabled.len() {
                println!("No disabled tool number {n}. Type disabled to list them.");
                continue;
            }
            let tool = &disabled[n - 1];
            match self.manager.activate(tool) {
                Ok(_) => println!("Enabled {}.", self.manager.display_name(tool)),
                Err(e) => println!("Error: {e}"),
            }
        }
        self.show_menu();
    }

    fn deactivate(&mut self, indices: &[usize]) {
        // Resolve every index against the menu as shown before mutating
        let targets: Vec<Option<String>> = indices
            .iter()
            .map(|&n| self.displayed.get(n.wrapping_sub(1)).cloned())
            .collect();
        for (i, target) in indices.iter().zip(targets) {
            match target {
                Some(tool) => match self.manager.deactivate(&tool) {
                    Ok(_) => println!("Disabled {}.", self.manager.display_name(&tool)),
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("No tool number {i}."),
            }
        }
        self.show_menu();
    }

    fn set(&mut self, key: &str, value: &str) {
        let result = match key {
            "max_recent" => match value.parse::<usize>() {
                Ok(n) if n > 0 => self.manager.update_settings(|s| s.max_recent = n),
                _ => {
                    println!("max_recent needs a positive number.");
                    return;
                }
            },
            "show_descriptions" => match value.parse::<bool>() {
                Ok(flag) => self.manager.update_settings(|s| s.show_descriptions = flag),
                Err(_) => {
                    println!("show_descriptions needs true or false.");
                    return;
                }
            },
            _ => {
                println!("Unknown setting '{key}'. Type set to see the settings.");
                return;
            }
        };
        match result {
            Ok(()) => println!("Saved."),
            Err(e) => println!("Error: {e}"),
        }
    }

    fn set_category(&mut self, n: usize, key: &str) {
        let Some(tool) = self.tool_at(n) else { return };
        let Some(category) = Category::from_key(key) else {
            let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
            println!("Unknown category '{key}'. One of: {}.", keys.join(", "));
            return;
        };
        match self.manager.set_manual_category(&tool, category) {
            Ok(()) => println!(
                "Pinned {} to {}.",
                self.manager.display_name(&tool),
                category.info().name
            ),
            Err(e) => println!("Error: {e}"),
        }
    }

    fn export(&mut self, n: usize) {
        let Some(tool) = self.tool_at(n) else { return };
        match self.manager.export_tool(&tool) {
            Some(path) => println!("Exported to {}.", path.display()),
            None => println!("Export failed for {}.", self.manager.display_name(&tool)),
        }
    }

    fn import(&mut self, path: &str) {
        let source = Path::new(path);
        match self.manager.import_tool(source, false) {
            Ok(ImportOutcome::Imported(tool)) => {
                println!("Imported {tool}.");
                self.show_menu();
            }
            Ok(ImportOutcome::Exists(tool)) => {
                if confirm(&format!("{tool} already exists. Overwrite?")) {
                    match self.manager.import_tool(source, true) {
                        Ok(_) => {
                            println!("Imported {tool}.");
                            self.show_menu();
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                } else {
                    println!("Import cancelled.");
                }
            }
            Err(e) => println!("Error: {e}"),
        }
    }

    fn delete(&mut self, n: usize) {
        let Some(tool) = self.tool_at(n) else { return };
        let name = self.manager.display_name(&tool);
        if !confirm(&format!("Delete {name} permanently?")) {
            println!("Delete cancelled.");
            return;
        }
        match self.manager.delete_tool(&tool) {
            Ok(()) => {
                println!("Deleted {name}.");
                self.show_menu();
            }
            Err(e) => println!("Error: {e}"),
        }
    }
}

/// Ask a yes/no question on the terminal. Anything but y/yes is no.
fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
