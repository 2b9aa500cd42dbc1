//! Validate-config command: check the configuration file and pattern
//! library without processing any text.

use crate::catalog::PatternCatalog;
use crate::config::RedactionConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also compile the pattern library referenced by the configuration
    #[arg(long, default_value_t = true)]
    pub check_patterns: bool,
}

/// Execute the validate-config command.
pub fn execute(args: &ValidateArgs, config: &RedactionConfig) -> Result<()> {
    config
        .validate()
        .map_err(crate::domain::RedactionError::Configuration)?;
    println!("Configuration: OK");

    if args.check_patterns {
        match &config.engine.pattern_library {
            Some(path) => {
                PatternCatalog::from_file(path)?;
                println!("Pattern library: OK ({path})");
            }
            None => {
                PatternCatalog::default_catalog()?;
                println!("Pattern library: OK (embedded default)");
            }
        }
    }

    println!("Entities configured: {}", config.engine.entities.len());
    Ok(())
}
