//! Redact command: read text, redact, write or print the result.

use crate::config::RedactionConfig;
use crate::domain::{RedactionError, Result};
use crate::redaction::RedactionService;
use clap::Args;
use std::io::Read;
use tracing::info;

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Input file; stdin when absent
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file; stdout when absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit the full result (original, redacted, spans, metadata) as JSON
    #[arg(long)]
    pub json: bool,

    /// Print a per-type detection summary to stderr
    #[arg(long)]
    pub show_spans: bool,
}

/// Execute the redact command.
pub fn execute(args: &RedactArgs, config: &RedactionConfig) -> Result<()> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            RedactionError::InvalidInput(format!("Failed to read input file: {e}"))
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| RedactionError::InvalidInput(format!("Failed to read stdin: {e}")))?;
            buffer
        }
    };

    let service = RedactionService::new(config)?;
    let result = service.redact(&text)?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&result)
            .map_err(|e| RedactionError::Internal(format!("Failed to serialize result: {e}")))?
    } else {
        result.redacted.clone()
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path = %path, count = result.metadata.count, "Redacted output written");
        }
        None => println!("{rendered}"),
    }

    if args.show_spans {
        // Counts and types only; never the matched text.
        eprintln!("Detections: {}", result.metadata.count);
        for entity in &result.metadata.types {
            let count = result
                .spans
                .iter()
                .filter(|s| s.entity_type == *entity)
                .count();
            eprintln!("  {entity}: {count}");
        }
    }

    Ok(())
}
