//! toolbelt
//!
//! An interactive launcher for a personal collection of utility scripts,
//! plus a generic batch file-processing framework the heavier tools are
//! built on.
//!
//! ## Features
//!
//! - Tool discovery over a `tools/py`//`tools/sh` directory layout, with
//!   legacy flat layouts still recognized
//! - A blocking text-menu shell: search, favorites, recent history,
//!   enable/disable, usage statistics
//! - Keyword-based category grouping with per-tool manual overrides
//! - Tool export/import as zip archives
//! - Persisted JSON state with forward-compatible back-fill of missing
//!   fields
//! - `BatchProcessor`: parallel many-files processing with per-file
//!   error isolation and aggregate statistics
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use toolbelt::{cli::Cli, run_with_cli};
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse();
//!     let code = run_with_cli(&cli)?;
//!     std::process::exit(code);
//! }
//! ```
//!
//! ## Environment Variables
//!
//! - `TOOLBELT_TOOLS_DIR`: tools directory (default `tools`)
//! - `TOOLBELT_STATE_FILE`: state file location (default: platform data
//!   directory)
//! - `RUST_LOG`: log filter, takes priority over `-v`/`-q`

pub mod batch;
pub mod categories;
pub mod cli;
pub mod launcher;
pub mod registry;
pub mod shell;
pub mod types;

pub use batch::{BatchError, BatchProcessor, BatchReport, BatchStats, FileJob, FileOutcome};
pub use categories::Category;
pub use cli::Cli;
pub use launcher::run_with_cli;
pub use registry::{ImportOutcome, StateChange, StateStore, ToolManager};
pub use shell::Shell;
pub use types::{LauncherError, Result, ToolKind, ToolMetadata};
