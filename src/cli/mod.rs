//! CLI interface and argument parsing
//!
//! Command-line interface for Tamarack using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tamarack - Canadian clinical text redaction
#[derive(Parser, Debug)]
#[command(name = "tamarack")]
#[command(version, about, long_about = None)]
#[command(author = "Tamarack Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tamarack.toml", env = "TAMARACK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TAMARACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact PII/PHI from a text file or stdin
    Redact(commands::redact::RedactArgs),

    /// Validate configuration and pattern library
    ValidateConfig(commands::validate::ValidateArgs),
}
