//! toolbelt binary
//!
//! Run with: cargo run
//!
//! For help: cargo run -- --help

use std::io::IsTerminal;

use clap::Parser;
use toolbelt::{cli::Cli, run_with_cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match run_with_cli(&cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);

            if std::io::stdin().is_terminal() {
                eprintln!("\nFor debugging, run with --diagnostic to log to a file.");
                eprintln!("Or use -v/-vv for more verbose logging.");
            }

            std::process::exit(1);
        }
    }
}
