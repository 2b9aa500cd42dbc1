//! Redaction engine: drives the two-pass pipeline for one request.
//!
//! Per request the engine annotates the text, runs the pass-1 recognizer
//! registry, folds confirmed patient names into a fresh request-scoped
//! cache, runs the pass-2 dictionary recognizer, merges, and substitutes
//! placeholders. The cache is a local of the request and is dropped with
//! the call frame; nothing request-scoped touches process-wide state.

use crate::catalog::PatternCatalog;
use crate::config::EngineConfig;
use crate::domain::{EntityType, RedactionError, RedactionResult, Result, Span};
use crate::nlp::{AnnotatedDocument, Annotator, NlpEngine};
use crate::redaction::anonymizer::apply_placeholders;
use crate::redaction::cache::NameCache;
use crate::redaction::merge::merge_spans;
use crate::redaction::pass2::CachedNameRecognizer;
use crate::redaction::recognizers::{create_pass1_recognizers, Recognizer};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Cooperative cancellation flag, checked at recognizer boundaries.
///
/// Cancelling abandons the request without mutating any process-wide
/// state; no partial result is surfaced.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is never cancelled unless [`cancel`](Self::cancel) is
    /// called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Two-pass redaction engine.
///
/// Safe to share across threads; every call gets its own cache and the
/// catalog and compiled patterns are immutable.
pub struct RedactionEngine {
    catalog: Arc<PatternCatalog>,
    annotator: Annotator,
    recognizers: Vec<Box<dyn Recognizer>>,
    entities: HashSet<EntityType>,
    threshold: f32,
}

impl std::fmt::Debug for RedactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactionEngine")
            .field("catalog", &self.catalog)
            .field("recognizers", &self.recognizers.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("entities", &self.entities)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl RedactionEngine {
    /// Build an engine from configuration, a catalog, and an NLP backend.
    pub fn new(
        config: &EngineConfig,
        catalog: Arc<PatternCatalog>,
        nlp: Arc<dyn NlpEngine>,
    ) -> Result<Self> {
        if config.entities.is_empty() {
            return Err(RedactionError::InvalidInput(
                "entity-type configuration must not be empty".to_string(),
            ));
        }

        let annotator = Annotator::new(nlp, &catalog);
        let recognizers = create_pass1_recognizers(&catalog);

        Ok(Self {
            catalog,
            annotator,
            recognizers,
            entities: config.entities.iter().copied().collect(),
            threshold: config.confidence_threshold,
        })
    }

    /// Redact one unit of text.
    pub fn process(&self, text: &str) -> Result<RedactionResult> {
        self.process_cancellable(text, &CancellationToken::new())
    }

    /// Redact one unit of text, abandoning work at the next recognizer
    /// boundary if `token` is cancelled.
    pub fn process_cancellable(
        &self,
        text: &str,
        token: &CancellationToken,
    ) -> Result<RedactionResult> {
        if text.is_empty() {
            return Err(RedactionError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        let started = Instant::now();

        // Annotate once; recognizers share the parsed document.
        let doc = self.annotator.annotate(text)?;

        // Pass 1. A failing recognizer is skipped for this request and the
        // pipeline continues with reduced recall.
        let mut pass1: Vec<Span> = Vec::new();
        for recognizer in &self.recognizers {
            if token.is_cancelled() {
                return Err(RedactionError::Cancelled);
            }
            match recognizer.recognize(&doc) {
                Ok(spans) => pass1.extend(spans),
                Err(e) => {
                    warn!(
                        rule = recognizer.name(),
                        error_class = error_class(&e),
                        "Recognizer failed; skipping for this request"
                    );
                }
            }
        }
        pass1.retain(|s| self.accepts(s));

        // Populate the request-scoped cache from confirmed patient names.
        let mut cache = NameCache::new(&self.catalog);
        for span in &pass1 {
            if span.entity_type == EntityType::PatientName {
                cache.add_full_name(doc.slice(span.start, span.end));
            }
        }

        if token.is_cancelled() {
            return Err(RedactionError::Cancelled);
        }

        // Pass 2 runs only when the cache saw at least one name and
        // patient names are in the configured set.
        let pass2 = if cache.is_initialized() && self.entities.contains(&EntityType::PatientName)
        {
            let mut spans = CachedNameRecognizer::new(&self.catalog, &cache).analyze(&doc);
            spans.retain(|s| self.accepts(s));
            spans
        } else {
            Vec::new()
        };

        let (full_names, parts) = cache.summary();
        let pass1_count = pass1.len();
        let pass2_count = pass2.len();

        let merged = merge_spans(pass1, pass2);
        let redacted = apply_placeholders(doc.text(), &merged, &self.catalog);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            text_chars = doc.char_len(),
            pass1 = pass1_count,
            pass2 = pass2_count,
            accepted = merged.len(),
            cached_names = full_names,
            cached_parts = parts,
            elapsed_ms,
            "Redaction completed"
        );

        Ok(RedactionResult::new(
            text.to_string(),
            redacted,
            merged,
            self.annotator.engine_name(),
            elapsed_ms,
        ))
    }

    fn accepts(&self, span: &Span) -> bool {
        self.entities.contains(&span.entity_type) && span.score >= self.threshold
    }

    /// Shared document annotation, exposed for integration tests.
    pub fn annotate(&self, text: &str) -> Result<AnnotatedDocument> {
        self.annotator.annotate(text)
    }
}

fn error_class(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<regex::Error>().is_some() {
        "regex"
    } else if e.downcast_ref::<std::io::Error>().is_some() {
        "io"
    } else {
        "other"
    }
}
