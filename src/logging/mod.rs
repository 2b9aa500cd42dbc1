//! Structured logging setup using tracing.
//!
//! Console output is always enabled; an optional JSON file layer with
//! daily rotation can be switched on through configuration. Log lines
//! carry counts, lengths, rule names, error classes, and timing only;
//! input text never reaches a sink.

use crate::config::LoggingConfig;
use crate::domain::{RedactionError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of the program to
/// ensure buffered log lines are flushed.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Initialize the logging system based on configuration.
///
/// Returns a [`LoggingGuard`] that must be kept alive for the duration of
/// the program. Fails if the subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(&config.level)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tamarack={log_level}")));

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(env_filter)
        .boxed();
    layers.push(console_layer);

    let file_guard = if config.file_enabled {
        std::fs::create_dir_all(&config.file_path).map_err(|e| {
            RedactionError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.file_path
            ))
        })?;

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.file_path, "tamarack.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_env_filter = EnvFilter::new(format!("tamarack={log_level}"));
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_filter(file_env_filter)
            .boxed();

        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| RedactionError::Configuration(format!("Logging init failed: {e}")))?;

    tracing::info!(
        level = %log_level,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(RedactionError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
