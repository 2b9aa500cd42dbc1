// Tamarack - Canadian Clinical Text Redaction Engine
// Copyright (c) 2026 Tamarack Contributors
// Licensed under the MIT License

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tamarack::cli::{Cli, Commands};
use tamarack::config::{load_config, RedactionConfig};
use tamarack::logging::init_logging;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Absent config file falls back to defaults so `tamarack redact` works
    // out of the box.
    let mut config = if Path::new(&cli.config).exists() {
        match load_config(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        RedactionConfig::default()
    };

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match &cli.command {
        Commands::Redact(args) => tamarack::cli::commands::redact::execute(args, &config),
        Commands::ValidateConfig(args) => {
            tamarack::cli::commands::validate::execute(args, &config)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error_class = e.kind(), "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
