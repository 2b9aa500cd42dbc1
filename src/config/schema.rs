//! Configuration schema types

use crate::domain::EntityType;
use serde::{Deserialize, Serialize};

/// Root Tamarack configuration, mapped from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RedactionConfig {
    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RedactionConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum confidence score for entity retention
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Entity types to detect
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityType>,

    /// Optional path to a custom pattern library; the embedded default
    /// library is used when absent
    #[serde(default)]
    pub pattern_library: Option<String>,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "engine.confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }
        if self.entities.is_empty() {
            return Err("engine.entities must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            entities: default_entities(),
            pattern_library: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON file logging in addition to console output
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for rolling log files
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            file_path: default_file_path(),
        }
    }
}

// Default value functions
fn default_confidence_threshold() -> f32 {
    0.35
}

fn default_entities() -> Vec<EntityType> {
    EntityType::ALL.to_vec()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_path() -> String {
    "logs".to_string()
}
