//! Clinical annotation post-pass.
//!
//! After parsing, two deterministic annotations are written onto the
//! document:
//!
//! - **Provider tagging**: a PERSON entity immediately preceded by a
//!   healthcare title ("Dr.", "Nurse", ...) is marked as a provider on
//!   every token. The title itself is not part of the entity. Punctuation
//!   between the title and the name defeats the tag; that conservatism is
//!   intentional and leans toward redaction.
//! - **Patient role tagging**: the `nsubj` subject of an active patient
//!   verb ("complained", "reported", ...) or the `nsubjpass` subject of a
//!   passive patient verb ("was admitted", "was discharged", ...) is
//!   marked with the patient role, and the role is spread to the whole
//!   containing PERSON entity unless the entity has a provider token.
//!
//! Both passes run sentence-ascending, token-ascending, and are idempotent.

use crate::catalog::PatternCatalog;
use crate::domain::{RedactionError, Result};
use crate::nlp::{AnnotatedDocument, DepLabel, NerLabel, NlpEngine};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Wraps an [`NlpEngine`] and applies the clinical annotation post-pass.
pub struct Annotator {
    engine: Arc<dyn NlpEngine>,
    titles: HashSet<String>,
    verbs_active: HashSet<String>,
    verbs_passive: HashSet<String>,
}

impl Annotator {
    /// Build an annotator over `engine`, taking vocabularies from `catalog`.
    pub fn new(engine: Arc<dyn NlpEngine>, catalog: &PatternCatalog) -> Self {
        let vocab = catalog.vocabulary();
        Self {
            engine,
            titles: vocab.healthcare_titles.clone(),
            verbs_active: vocab.patient_verbs_active.clone(),
            verbs_passive: vocab.patient_verbs_passive.clone(),
        }
    }

    /// Name of the wrapped backend.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Parse and annotate `text`.
    pub fn annotate(&self, text: &str) -> Result<AnnotatedDocument> {
        let parsed = self
            .engine
            .parse(text)
            .map_err(|e| RedactionError::Internal(format!("NLP parse failed: {e}")))?;

        let mut doc = AnnotatedDocument::new(text.to_string(), parsed);
        self.tag_providers(&mut doc);
        self.tag_patient_roles(&mut doc);

        debug!(
            tokens = doc.tokens().len(),
            entities = doc.entities().len(),
            "Document annotated"
        );
        Ok(doc)
    }

    /// Mark PERSON entities preceded by a healthcare title.
    fn tag_providers(&self, doc: &mut AnnotatedDocument) {
        let mut tagged: Vec<usize> = Vec::new();

        for entity in doc.entities() {
            if entity.label != NerLabel::Person || entity.start_token == 0 {
                continue;
            }

            let prev = &doc.tokens()[entity.start_token - 1];
            let surface = prev.text.to_lowercase();
            let stripped = surface.strip_suffix('.').unwrap_or(&surface);

            if self.titles.contains(stripped) {
                tagged.extend(entity.start_token..entity.end_token);
            }
        }

        for idx in tagged {
            doc.set_provider(idx);
        }
    }

    /// Mark subjects of patient verbs, spreading to containing entities.
    fn tag_patient_roles(&self, doc: &mut AnnotatedDocument) {
        let mut subjects: Vec<usize> = Vec::new();

        for (idx, token) in doc.tokens().iter().enumerate() {
            let verbs = match token.dep {
                DepLabel::NSubj => &self.verbs_active,
                DepLabel::NSubjPass => &self.verbs_passive,
                DepLabel::None => continue,
            };

            let head = match doc.tokens().get(token.head) {
                Some(head) => head,
                None => continue,
            };

            if verbs.contains(&head.lemma) {
                subjects.push(idx);
            }
        }

        for idx in subjects {
            if doc.is_provider(idx) {
                continue;
            }
            doc.set_patient_role(idx);

            // Spread the role across the containing PERSON entity when the
            // entity carries no provider token.
            let spread: Option<(usize, usize)> = doc
                .entities()
                .iter()
                .find(|e| {
                    e.label == NerLabel::Person && e.start_token <= idx && idx < e.end_token
                })
                .filter(|e| !doc.entity_has_provider(e))
                .map(|e| (e.start_token, e.end_token));

            if let Some((from, to)) = spread {
                for i in from..to {
                    doc.set_patient_role(i);
                }
            }
        }
    }
}
