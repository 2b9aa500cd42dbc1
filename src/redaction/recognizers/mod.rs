//! Pass-1 recognizers.
//!
//! Each recognizer independently scans the annotated document and emits
//! candidate spans; the union of their output is the pass-1 candidate set.
//! Recognizers never share state and may run in any order. The registry is
//! a flat ordered list built at startup from the pattern catalog.

pub mod patient;
pub mod patterns;

use crate::catalog::{CompiledRule, PatternCatalog};
use crate::domain::{EntityType, Span};
use crate::nlp::AnnotatedDocument;
use tracing::{info, warn};

pub use patient::{PatientContextRecognizer, PatientRoleRecognizer};
pub use patterns::{
    CreditCardRecognizer, PatientNamePatternRecognizer, PatternEntityRecognizer,
    ProvincialHealthRecognizer,
};

/// A pass-1 recognizer: given an annotated document, produce candidate
/// spans. Implementations must be deterministic and must not reach into
/// another recognizer's state.
pub trait Recognizer: Send + Sync {
    /// Registry name, used in logs when the recognizer is skipped.
    fn name(&self) -> &str;

    /// Scan the document and emit zero or more candidate spans.
    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>>;
}

/// Emit spans for every non-empty match of a compiled rule.
///
/// When the regex defines a named capture group `id`, only that group is
/// emitted; label-anchored patterns use it so the label survives
/// redaction. Byte offsets from the regex engine are converted to
/// character offsets through the document's offset map.
pub(crate) fn emit_rule_matches(
    rule: &CompiledRule,
    entity: EntityType,
    doc: &AnnotatedDocument,
) -> Vec<Span> {
    let text = doc.text();
    let mut spans = Vec::new();

    let has_id_group = rule
        .regex
        .capture_names()
        .flatten()
        .any(|name| name == "id");

    if has_id_group {
        for caps in rule.regex.captures_iter(text) {
            if let Some(m) = caps.name("id") {
                if !m.as_str().is_empty() {
                    let (start, end) = doc.offsets().char_range(m.start(), m.end());
                    spans.push(Span::new(entity, start, end, rule.score, rule.name.clone()));
                }
            }
        }
    } else {
        for m in rule.regex.find_iter(text) {
            if !m.as_str().is_empty() {
                let (start, end) = doc.offsets().char_range(m.start(), m.end());
                spans.push(Span::new(entity, start, end, rule.score, rule.name.clone()));
            }
        }
    }

    spans
}

/// Build the standard pass-1 recognizer set from the catalog.
///
/// Entity types with no configured patterns are skipped with a warning
/// rather than failing the load.
pub fn create_pass1_recognizers(catalog: &PatternCatalog) -> Vec<Box<dyn Recognizer>> {
    let mut recognizers: Vec<Box<dyn Recognizer>> = Vec::new();

    for (entity, code) in EntityType::PROVINCIAL {
        if catalog.has_patterns(entity) {
            recognizers.push(Box::new(ProvincialHealthRecognizer::new(
                entity,
                code,
                catalog.rules_for(entity).to_vec(),
            )));
        } else {
            warn!(entity = entity.label(), "Skipping provincial recognizer: no patterns found");
        }
    }

    let pattern_entities = [
        EntityType::Phone,
        EntityType::Email,
        EntityType::Address,
        EntityType::Dob,
        EntityType::PostalCode,
        EntityType::Province,
        EntityType::BankAccount,
        EntityType::TransactionId,
        EntityType::BankName,
        EntityType::MedicalRecordNumber,
    ];

    for entity in pattern_entities {
        if catalog.has_patterns(entity) {
            recognizers.push(Box::new(PatternEntityRecognizer::new(
                entity,
                catalog.rules_for(entity).to_vec(),
            )));
        } else {
            warn!(entity = entity.label(), "Skipping pattern recognizer: no patterns found");
        }
    }

    if catalog.has_patterns(EntityType::CreditCard) {
        recognizers.push(Box::new(CreditCardRecognizer::new(
            catalog.rules_for(EntityType::CreditCard).to_vec(),
        )));
    } else {
        warn!("Skipping credit-card recognizer: no patterns found");
    }

    if catalog.has_patterns(EntityType::PatientName) {
        recognizers.push(Box::new(PatientNamePatternRecognizer::new(
            catalog.rules_for(EntityType::PatientName).to_vec(),
        )));
    } else {
        warn!("Skipping patient-name pattern recognizer: no patterns found");
    }

    recognizers.push(Box::new(PatientContextRecognizer::new(catalog)));
    recognizers.push(Box::new(PatientRoleRecognizer::new()));

    info!(count = recognizers.len(), "Initialized pass-1 recognizer set");
    recognizers
}
