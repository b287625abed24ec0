//! Launcher entry points
//!
//! Wires the CLI to logging and the shell. Diagnostic mode writes log
//! lines to a file so they never interleave with the interactive menu;
//! normal mode logs to stderr.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::registry::{StateStore, ToolManager};
use crate::shell::Shell;

/// Build an EnvFilter based on CLI args and RUST_LOG environment variable
///
/// Priority: RUST_LOG environment variable > CLI arguments (-v, -vv, -q)
fn build_env_filter(cli: &Cli) -> tracing_subscriber::EnvFilter {
    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        if !rust_log.is_empty() {
            return tracing_subscriber::EnvFilter::new(rust_log);
        }
    }

    let level = cli.log_level();
    tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into())
}

/// Initialize logging with file output (diagnostic mode)
fn init_logging_to_file(cli: &Cli) -> anyhow::Result<()> {
    let filter = build_env_filter(cli);
    let log_path = cli.log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&log_path)?;

    // Output log file location to stderr (user needs to know)
    eprintln!("Diagnostic mode: logging to {}", log_path.display());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

/// Initialize logging with stderr output (normal mode)
fn init_logging_to_stderr(cli: &Cli) {
    let filter = build_env_filter(cli);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Run the launcher with parsed CLI arguments. Returns the process exit
/// code: a `--run` tool's own code, otherwise zero.
pub fn run_with_cli(cli: &Cli) -> anyhow::Result<i32> {
    if cli.is_diagnostic() {
        init_logging_to_file(cli)?;
    } else {
        init_logging_to_stderr(cli);
    }

    let store = match &cli.state_file {
        Some(path) => StateStore::open(path.clone()),
        None => StateStore::open(StateStore::default_path()),
    };
    tracing::debug!(
        tools_dir = %cli.tools_dir.display(),
        state_file = %store.path().display(),
        "starting launcher"
    );
    let mut manager = ToolManager::new(&cli.tools_dir, store);

    if cli.list {
        for tool in manager.tool_list(true) {
            println!("{}", manager.labeled_display_name(&tool));
        }
        return Ok(0);
    }

    if let Some(tool) = &cli.run {
        let code = manager.run_tool(tool)?;
        return Ok(code);
    }

    let mut shell = Shell::new(manager);
    shell.run()?;
    Ok(0)
}
