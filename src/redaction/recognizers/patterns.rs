//! Pattern-driven recognizers: generic regex entities, credit cards with
//! checksum gating, provincial health numbers, and explicit patient-name
//! form lines.

use super::{emit_rule_matches, Recognizer};
use crate::catalog::CompiledRule;
use crate::domain::{EntityType, Span};
use crate::nlp::AnnotatedDocument;
use crate::validators::{digits_only, luhn_check, ProvinceValidator};
use tracing::debug;

/// One recognizer per non-name entity type; evaluates the configured regex
/// alternatives and emits a span per non-empty match.
pub struct PatternEntityRecognizer {
    entity: EntityType,
    rules: Vec<CompiledRule>,
    name: String,
}

impl PatternEntityRecognizer {
    pub fn new(entity: EntityType, rules: Vec<CompiledRule>) -> Self {
        Self {
            entity,
            rules,
            name: format!("regex_{}", entity.label().to_lowercase()),
        }
    }
}

impl Recognizer for PatternEntityRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            spans.extend(emit_rule_matches(rule, self.entity, doc));
        }
        Ok(spans)
    }
}

/// Credit-card recognizer. Regex candidates must additionally have 13-19
/// digits after separator stripping, a leading digit in {3, 4, 5, 6}, and
/// a valid Luhn checksum; anything else is dropped.
pub struct CreditCardRecognizer {
    rules: Vec<CompiledRule>,
}

impl CreditCardRecognizer {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    fn is_valid(candidate: &str) -> bool {
        let digits = digits_only(candidate);
        if !(13..=19).contains(&digits.len()) {
            return false;
        }
        if !matches!(digits.as_bytes()[0], b'3' | b'4' | b'5' | b'6') {
            return false;
        }
        luhn_check(&digits)
    }
}

impl Recognizer for CreditCardRecognizer {
    fn name(&self) -> &str {
        "credit_card"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for span in emit_rule_matches(rule, EntityType::CreditCard, doc) {
                if Self::is_valid(doc.slice(span.start, span.end)) {
                    spans.push(span);
                }
            }
        }
        Ok(spans)
    }
}

/// Provincial health-number recognizer. Regex candidates are gated by the
/// province validator; invalid matches are dropped.
pub struct ProvincialHealthRecognizer {
    entity: EntityType,
    validator: Option<ProvinceValidator>,
    rules: Vec<CompiledRule>,
    name: String,
}

impl ProvincialHealthRecognizer {
    pub fn new(entity: EntityType, code: &str, rules: Vec<CompiledRule>) -> Self {
        let validator = ProvinceValidator::for_code(code);
        if validator.is_none() {
            debug!(code, "No validator for province; format match accepted as-is");
        }
        Self {
            entity,
            validator,
            rules,
            name: format!("provincial_{code}"),
        }
    }
}

impl Recognizer for ProvincialHealthRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for span in emit_rule_matches(rule, self.entity, doc) {
                let valid = match self.validator {
                    Some(v) => v.validate(doc.slice(span.start, span.end)),
                    None => true,
                };
                if valid {
                    spans.push(span);
                }
            }
        }
        Ok(spans)
    }
}

/// Stage 1: explicit patient-name form lines ("Patient Name: ...",
/// "Pt Name: ..."). The configured patterns capture the name itself, so
/// the form label is preserved.
pub struct PatientNamePatternRecognizer {
    rules: Vec<CompiledRule>,
}

impl PatientNamePatternRecognizer {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }
}

impl Recognizer for PatientNamePatternRecognizer {
    fn name(&self) -> &str {
        "patient_name_pattern"
    }

    fn recognize(&self, doc: &AnnotatedDocument) -> anyhow::Result<Vec<Span>> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            spans.extend(emit_rule_matches(rule, EntityType::PatientName, doc));
        }
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use crate::nlp::{Annotator, HeuristicNlpEngine};
    use std::sync::Arc;

    fn annotate(text: &str) -> AnnotatedDocument {
        let catalog = PatternCatalog::global().unwrap();
        Annotator::new(Arc::new(HeuristicNlpEngine::new()), catalog)
            .annotate(text)
            .unwrap()
    }

    fn surface(doc: &AnnotatedDocument, span: &Span) -> String {
        doc.slice(span.start, span.end).to_string()
    }

    #[test]
    fn test_phone_recognizer() {
        let catalog = PatternCatalog::global().unwrap();
        let rec = PatternEntityRecognizer::new(
            EntityType::Phone,
            catalog.rules_for(EntityType::Phone).to_vec(),
        );
        let doc = annotate("Call (416) 555-1234 or 905-555-9876.");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(surface(&doc, &spans[0]), "(416) 555-1234");
    }

    #[test]
    fn test_mrn_label_preserved() {
        let catalog = PatternCatalog::global().unwrap();
        let rec = PatternEntityRecognizer::new(
            EntityType::MedicalRecordNumber,
            catalog.rules_for(EntityType::MedicalRecordNumber).to_vec(),
        );
        let doc = annotate("MRN: 12345678 on file.");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(surface(&doc, &spans[0]), "12345678");
    }

    #[test]
    fn test_credit_card_luhn_valid() {
        let catalog = PatternCatalog::global().unwrap();
        let rec = CreditCardRecognizer::new(catalog.rules_for(EntityType::CreditCard).to_vec());
        let doc = annotate("Card 4111 1111 1111 1111 on file.");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(surface(&doc, &spans[0]), "4111 1111 1111 1111");
    }

    #[test]
    fn test_credit_card_luhn_invalid_dropped() {
        let catalog = PatternCatalog::global().unwrap();
        let rec = CreditCardRecognizer::new(catalog.rules_for(EntityType::CreditCard).to_vec());
        let doc = annotate("Card 4111 1111 1111 1112 on file.");
        assert!(rec.recognize(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_credit_card_leading_digit_gate() {
        assert!(CreditCardRecognizer::is_valid("4111111111111111"));
        // Luhn-valid but only 11 digits
        assert!(!CreditCardRecognizer::is_valid("79927398713"));
        // 16 digits, Luhn-valid, leading digit outside {3,4,5,6}
        assert!(!CreditCardRecognizer::is_valid("9111111111111110"));
    }

    #[test]
    fn test_provincial_validator_gates_matches() {
        let catalog = PatternCatalog::global().unwrap();
        let rec = ProvincialHealthRecognizer::new(
            EntityType::OnHcn,
            "ON",
            catalog.rules_for(EntityType::OnHcn).to_vec(),
        );

        let doc = annotate("HCN 1234-567-897-XY on record.");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(surface(&doc, &spans[0]), "1234-567-897-XY");

        let doc = annotate("HCN 1234-567-890-XY on record.");
        assert!(rec.recognize(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_patient_name_form_line() {
        let catalog = PatternCatalog::global().unwrap();
        let rec =
            PatientNamePatternRecognizer::new(catalog.rules_for(EntityType::PatientName).to_vec());
        let doc = annotate("Patient Name: Jane Doe. DOB unknown.");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(surface(&doc, &spans[0]), "Jane Doe");
        assert_eq!(spans[0].score, 0.95);
    }

    #[test]
    fn test_pt_name_variant_case_insensitive() {
        let catalog = PatternCatalog::global().unwrap();
        let rec =
            PatientNamePatternRecognizer::new(catalog.rules_for(EntityType::PatientName).to_vec());
        let doc = annotate("pt name: John Smith");
        let spans = rec.recognize(&doc).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(surface(&doc, &spans[0]), "John Smith");
    }
}
