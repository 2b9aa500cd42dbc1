//! Pass-2 recognizer: document-local dictionary expansion.
//!
//! After pass 1 confirms patient names, this recognizer sweeps the text
//! again for other occurrences of those names and their parts. Both tiers
//! apply a provider safety check: a healthcare title in the 15-character
//! lookbehind window discards the match, so "Dr. Smith" survives even when
//! "Smith" is a confirmed patient name elsewhere in the document.

use crate::catalog::PatternCatalog;
use crate::domain::{EntityType, Span};
use crate::nlp::AnnotatedDocument;
use crate::redaction::cache::NameCache;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Characters of lookbehind inspected for a healthcare title.
const TITLE_WINDOW: usize = 15;

const FULL_NAME_SCORE: f32 = 0.95;
const NAME_PART_SCORE: f32 = 0.85;

/// Dictionary recognizer over the request's [`NameCache`].
pub struct CachedNameRecognizer<'a> {
    cache: &'a NameCache,
    title_regex: &'a Regex,
}

impl<'a> CachedNameRecognizer<'a> {
    /// Bind the recognizer to a populated cache for one request.
    pub fn new(catalog: &'a PatternCatalog, cache: &'a NameCache) -> Self {
        Self {
            cache,
            title_regex: catalog.title_regex(),
        }
    }

    /// Run both tiers over the document. Returns nothing when the cache
    /// was never initialized.
    pub fn analyze(&self, doc: &AnnotatedDocument) -> Vec<Span> {
        if !self.cache.is_initialized() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        let mut discarded = 0usize;

        // Tier A: full-name occurrences, word-boundary aware.
        for full_name in self.cache.full_names() {
            let regex = match full_name_regex(full_name) {
                Some(regex) => regex,
                None => continue,
            };

            for m in regex.find_iter(doc.text()) {
                let (start, end) = doc.offsets().char_range(m.start(), m.end());
                if self.is_provider_context(doc, start) {
                    discarded += 1;
                    continue;
                }
                spans.push(Span::new(
                    EntityType::PatientName,
                    start,
                    end,
                    FULL_NAME_SCORE,
                    "cache_full_name",
                ));
            }
        }

        // Tier B: name-part alternation, longest parts first.
        if let Some(part_regex) = self.cache.part_regex() {
            for m in part_regex.find_iter(doc.text()) {
                let (start, end) = doc.offsets().char_range(m.start(), m.end());
                if self.is_provider_context(doc, start) {
                    discarded += 1;
                    continue;
                }
                spans.push(Span::new(
                    EntityType::PatientName,
                    start,
                    end,
                    NAME_PART_SCORE,
                    "cache_name_part",
                ));
            }
        }

        if discarded > 0 {
            debug!(discarded, emitted = spans.len(), "Pass-2 provider safety check");
        }

        spans
    }

    /// True when the lookbehind window before `start` contains a
    /// healthcare title as a whole word.
    fn is_provider_context(&self, doc: &AnnotatedDocument, start: usize) -> bool {
        let window = doc.lookbehind_lower(start, TITLE_WINDOW);
        self.title_regex.is_match(&window)
    }
}

fn full_name_regex(full_name: &str) -> Option<Regex> {
    if full_name.is_empty() {
        return None;
    }
    let source = format!(r"\b{}\b", regex::escape(full_name));
    RegexBuilder::new(&source).case_insensitive(true).build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Annotator, HeuristicNlpEngine};
    use std::sync::Arc;

    fn annotate(text: &str) -> AnnotatedDocument {
        let catalog = PatternCatalog::global().unwrap();
        Annotator::new(Arc::new(HeuristicNlpEngine::new()), catalog)
            .annotate(text)
            .unwrap()
    }

    fn spans_for(text: &str, names: &[&str]) -> (AnnotatedDocument, Vec<Span>) {
        let catalog = PatternCatalog::global().unwrap();
        let mut cache = NameCache::new(catalog);
        for name in names {
            cache.add_full_name(name);
        }
        let doc = annotate(text);
        let spans = CachedNameRecognizer::new(catalog, &cache).analyze(&doc);
        (doc, spans)
    }

    #[test]
    fn test_uninitialized_cache_yields_nothing() {
        let (_, spans) = spans_for("John Smith was here.", &[]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_full_name_tier_matches_case_insensitively() {
        let (doc, spans) = spans_for("Later JANE DOE returned.", &["Jane Doe"]);
        assert!(spans
            .iter()
            .any(|s| s.rule_name == "cache_full_name" && doc.slice(s.start, s.end) == "JANE DOE"));
    }

    #[test]
    fn test_name_part_tier_matches_single_tokens() {
        let (doc, spans) = spans_for("Doe was discharged.", &["Jane Doe"]);
        let part: Vec<_> = spans
            .iter()
            .filter(|s| s.rule_name == "cache_name_part")
            .collect();
        assert_eq!(part.len(), 1);
        assert_eq!(doc.slice(part[0].start, part[0].end), "Doe");
        assert_eq!(part[0].score, 0.85);
    }

    #[test]
    fn test_title_lookbehind_discards_provider_matches() {
        let (_, spans) = spans_for("Seen by Dr. Smith today.", &["Smith"]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_title_without_period_also_discards() {
        let (_, spans) = spans_for("Seen by Dr Smith today.", &["Smith"]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_plain_mention_is_emitted() {
        let (doc, spans) = spans_for("Then Smith went home.", &["Smith"]);
        assert!(!spans.is_empty());
        assert!(spans.iter().all(|s| doc.slice(s.start, s.end) == "Smith"));
    }

    #[test]
    fn test_word_boundary_prevents_substring_hits() {
        let (_, spans) = spans_for("The blacksmith repaired it.", &["Smith"]);
        assert!(spans.is_empty());
    }
}
