//! Patient-name recognizers driven by clinical annotations.
//!
//! Stage 2 reads the patient role written by the annotator; stage 3 reads
//! a lookbehind context window. Both refuse to emit over provider-tagged
//! entities.

use super::Recognizer;
use crate::catalog::PatternCatalog;
use crate::domain::{EntityType, Span};
use crate::nlp::{AnnotatedDocument, NerLabel};
use regex::Regex;

/// Characters of lookbehind inspected for patient context keywords.
const CONTEXT_WINDOW: usize = 30;

/// Stage 2: PERSON entities whose tokens carry the patient role from
/// dependency parsing, score 0.85.
pub struct PatientRoleRecognizer;

impl PatientRoleRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PatientRoleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for PatientRoleRecognizer {
    fn name(&self) -> &str {
        "patient_role"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let spans = doc
            .entities()
            .iter()
            .filter(|e| e.label == NerLabel::Person)
            .filter(|e| doc.entity_has_patient_role(e) && !doc.entity_has_provider(e))
            .map(|e| {
                Span::new(
                    EntityType::PatientName,
                    e.start,
                    e.end,
                    0.85,
                    "patient_role",
                )
            })
            .collect();
        Ok(spans)
    }
}

/// Stage 3: PERSON entities preceded by a patient context keyword
/// ("patient", "pt", ...) within a 30-character window, score 0.90.
pub struct PatientContextRecognizer {
    keyword_regex: Regex,
}

impl PatientContextRecognizer {
    pub fn new(catalog: &PatternCatalog) -> Self {
        Self {
            keyword_regex: catalog.context_keyword_regex().clone(),
        }
    }
}

impl Recognizer for PatientContextRecognizer {
    fn name(&self) -> &str {
        "patient_context"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let mut spans = Vec::new();

        for entity in doc.entities() {
            if entity.label != NerLabel::Person || doc.entity_has_provider(entity) {
                continue;
            }

            let window = doc.lookbehind_lower(entity.start, CONTEXT_WINDOW);
            if self.keyword_regex.is_match(&window) {
                spans.push(Span::new(
                    EntityType::PatientName,
                    entity.start,
                    entity.end,
                    0.90,
                    "patient_context",
                ));
            }
        }

        Ok(spans)
    }
}
