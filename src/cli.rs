//! Command-line interface definitions
//!
//! Provides CLI argument parsing using clap for the toolbelt launcher.

use std::path::PathBuf;

use clap::Parser;

/// toolbelt - interactive launcher for personal utility scripts
#[derive(Parser, Debug, Clone)]
#[command(name = "toolbelt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the tool scripts
    #[arg(short = 't', long, value_name = "DIR", env = "TOOLBELT_TOOLS_DIR", default_value = "tools")]
    pub tools_dir: PathBuf,

    /// State file location (defaults to the platform data directory)
    #[arg(long, value_name = "FILE", env = "TOOLBELT_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Print the tool list and exit instead of starting the shell
    #[arg(long)]
    pub list: bool,

    /// Run a single tool by name and exit with its code
    #[arg(long, value_name = "TOOL")]
    pub run: Option<String>,

    /// Enable diagnostic mode (auto-log to temp file)
    #[arg(short, long)]
    pub diagnostic: bool,

    /// Log directory (implies diagnostic mode)
    #[arg(short = 'l', long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log file name (implies diagnostic mode)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    /// Note: RUST_LOG env var takes priority over this flag
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors)
    /// Note: RUST_LOG env var takes priority over this flag
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            tools_dir: PathBuf::from("tools"),
            state_file: None,
            list: false,
            run: None,
            diagnostic: false,
            log_dir: None,
            log_file: None,
            verbose: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// Check if diagnostic mode is enabled (output to file)
    ///
    /// Returns true if `--diagnostic` is set, or if `--log-dir` or `--log-file` is specified.
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic || self.log_dir.is_some() || self.log_file.is_some()
    }

    /// Get the log level based on CLI arguments
    ///
    /// - `--quiet`: ERROR
    /// - default: WARN (keeps stderr quiet under the interactive menu)
    /// - `-v`: INFO
    /// - `-vv`: DEBUG
    /// - `-vvv` or more: TRACE
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else {
            match self.verbose {
                0 => tracing::Level::WARN,
                1 => tracing::Level::INFO,
                2 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            }
        }
    }

    /// Get the log file path for diagnostic mode
    ///
    /// Uses the specified log directory and file name, or defaults to:
    /// - Directory: system temp directory
    /// - File: `toolbelt-{timestamp}.log`
    pub fn log_path(&self) -> PathBuf {
        let dir = self.log_dir.clone().unwrap_or_else(std::env::temp_dir);

        let filename = self.log_file.clone().unwrap_or_else(|| {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            format!("toolbelt-{timestamp}.log")
        });

        dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cli() {
        let cli = Cli::default();
        assert!(!cli.is_diagnostic());
        assert_eq!(cli.log_level(), tracing::Level::WARN);
        assert_eq!(cli.tools_dir, PathBuf::from("tools"));
    }

    #[test]
    fn test_log_dir_implies_diagnostic() {
        let cli = Cli {
            log_dir: Some(PathBuf::from("/tmp")),
            ..Default::default()
        };
        assert!(cli.is_diagnostic());
    }

    #[test]
    fn test_log_file_implies_diagnostic() {
        let cli = Cli {
            log_file: Some("test.log".to_string()),
            ..Default::default()
        };
        assert!(cli.is_diagnostic());
    }

    #[test]
    fn test_log_levels() {
        let cli = Cli {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(cli.log_level(), tracing::Level::ERROR);

        // Interactive default stays below the menu's stdout traffic
        let cli = Cli::default();
        assert_eq!(cli.log_level(), tracing::Level::WARN);

        let cli = Cli {
            verbose: 1,
            ..Default::default()
        };
        assert_eq!(cli.log_level(), tracing::Level::INFO);

        let cli = Cli {
            verbose: 2,
            ..Default::default()
        };
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);

        let cli = Cli {
            verbose: 3,
            ..Default::default()
        };
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_log_path_custom_dir() {
        let cli = Cli {
            log_dir: Some(PathBuf::from("/var/log")),
            log_file: Some("test.log".to_string()),
            ..Default::default()
        };
        assert_eq!(cli.log_path(), PathBuf::from("/var/log/test.log"));
    }

    #[test]
    fn test_log_path_default_generates_timestamp() {
        let cli = Cli::default();
        let path = cli.log_path();

        assert!(path.starts_with(std::env::temp_dir()));

        let filename = path.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with("toolbelt-"));
        assert!(std::path::Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("log")));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["toolbelt", "-t", "/srv/tools", "--list", "-vv"]);
        assert_eq!(cli.tools_dir, PathBuf::from("/srv/tools"));
        assert!(cli.list);
        assert_eq!(cli.verbose, 2);
    }
}
