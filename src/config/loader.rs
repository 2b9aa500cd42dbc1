//! Configuration loader with TOML parsing and validation.

use crate::config::RedactionConfig;
use crate::domain::{RedactionError, Result};
use std::path::Path;
use tracing::info;

/// Load and validate configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RedactionConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        RedactionError::Configuration(format!("Failed to read {}: {e}", path.display()))
    })?;

    parse_config(&content).map(|config| {
        info!(path = %path.display(), "Configuration loaded");
        config
    })
}

/// Parse and validate configuration from TOML content.
pub fn parse_config(content: &str) -> Result<RedactionConfig> {
    let config: RedactionConfig = toml::from_str(content)
        .map_err(|e| RedactionError::Configuration(format!("TOML parse error: {e}")))?;

    config.validate().map_err(RedactionError::Configuration)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[engine]
confidence_threshold = 0.5
entities = ["PATIENT_NAME", "PHONE"]

[logging]
level = "debug"
file_enabled = true
file_path = "/tmp/tamarack-logs"
"#;
        let config = parse_config(content).unwrap();
        assert_eq!(config.engine.confidence_threshold, 0.5);
        assert_eq!(config.engine.entities.len(), 2);
        assert!(config.logging.file_enabled);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = parse_config("engine = nonsense").unwrap_err();
        assert!(matches!(err, RedactionError::Configuration(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[engine]\nconfidence_threshold = 3.0").unwrap_err();
        assert!(err.to_string().contains("confidence_threshold"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_config("/nonexistent/tamarack.toml").unwrap_err();
        assert!(matches!(err, RedactionError::Configuration(_)));
    }
}
