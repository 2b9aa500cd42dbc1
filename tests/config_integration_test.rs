//! Configuration and pattern-library loading against real files.

use std::io::Write;
use tamarack::catalog::PatternCatalog;
use tamarack::config::{load_config, RedactionConfig};
use tamarack::domain::{EntityType, RedactionError};
use tamarack::redaction::RedactionService;
use tempfile::NamedTempFile;

#[test]
fn config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[engine]
confidence_threshold = 0.6
entities = ["PATIENT_NAME", "PHONE", "ON_HCN"]

[logging]
level = "warn"
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.engine.confidence_threshold, 0.6);
    assert_eq!(
        config.engine.entities,
        vec![EntityType::PatientName, EntityType::Phone, EntityType::OnHcn]
    );
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn invalid_config_file_fails_with_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[engine]\nconfidence_threshold = \"high\"").unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, RedactionError::Configuration(_)));
}

#[test]
fn custom_pattern_library_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[vocabulary]
healthcare_titles = ["dr"]
patient_verbs_active = ["complain"]
patient_verbs_passive = ["admit"]
patient_context_keywords = ["patient"]
credit_card_context = ["card"]
stop_words = ["the"]

[[patterns.EMAIL]]
name = "email_simple"
regex = '\b\S+@\S+\.[A-Za-z]{{2,}}\b'
score = 0.9

[provinces.ON]
keywords = ["ohip"]
"#
    )
    .unwrap();

    let catalog = PatternCatalog::from_file(file.path()).unwrap();
    assert!(catalog.has_patterns(EntityType::Email));
    assert!(!catalog.has_patterns(EntityType::Phone));

    let mut config = RedactionConfig::default();
    config.engine.pattern_library = Some(file.path().to_string_lossy().into_owned());

    let service = RedactionService::new(&config).unwrap();
    let result = service.redact("Write to jdoe@example.ca today.").unwrap();
    assert_eq!(result.redacted, "Write to <EMAIL> today.");
}

#[test]
fn pattern_library_missing_section_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[vocabulary]\nhealthcare_titles = [\"dr\"]").unwrap();

    let err = PatternCatalog::from_file(file.path()).unwrap_err();
    assert!(matches!(err, RedactionError::Configuration(_)));
}

#[test]
fn pattern_library_bad_regex_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[vocabulary]
healthcare_titles = ["dr"]
patient_verbs_active = []
patient_verbs_passive = []
patient_context_keywords = []
credit_card_context = []
stop_words = []

[[patterns.PHONE]]
name = "broken"
regex = "(oops"
score = 0.5

[provinces.ON]
keywords = []
"#
    )
    .unwrap();

    let err = PatternCatalog::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid regex"));
}

#[test]
fn default_service_works_without_any_files() {
    let service = RedactionService::new(&RedactionConfig::default()).unwrap();
    let result = service.redact("Email jdoe@example.ca").unwrap();
    assert_eq!(result.redacted, "Email <EMAIL>");
}
