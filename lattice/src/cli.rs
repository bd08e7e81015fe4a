//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::StorageConfig;

/// Lattice - goal analysis and strategy synthesis
#[derive(Parser)]
#[command(
    name = "lattice",
    about = "Break a goal into risks and opportunities, then plan three ethically scored strategies",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; without one the interactive UI starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a goal and print the negative shifts, positive shifts and decay factors
    Analyze {
        /// The goal to analyze
        goal: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Analyze a goal, then generate and score the Alpha, Beta and Gamma strategies
    Strategize {
        /// The goal to plan for
        goal: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the saved Gemini API key
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },
}

/// API key subcommands
#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Save an API key
    Set {
        /// The Gemini API key
        key: String,
    },

    /// Show the saved key in redacted form
    Show,

    /// Delete the saved key
    Clear,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lattice")
        .join("logs")
        .join("lattice.log")
}

/// Generate the after_help text with key status and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let credential_path = StorageConfig::default().credential_path();
    let saved = credential_path.exists();

    let mut help = String::new();
    help.push_str("API Key:\n");
    let icon = if saved { "\u{2705}" } else { "\u{274C}" };
    let status = if saved { "saved" } else { "not set (run `lattice key set <KEY>`)" };
    help.push_str(&format!("  {} {}\n", icon, status));
    help.push_str(&format!("  {}\n", credential_path.display()));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for batch commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
