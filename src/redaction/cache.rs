//! Request-scoped patient name cache.
//!
//! Populated from pass-1 `PATIENT_NAME` spans and read by the pass-2
//! recognizer. The cache is owned by a single redaction call and passed
//! explicitly through the pipeline; it is never stored globally or in
//! thread-local state, so concurrent calls cannot observe each other's
//! names.

use crate::catalog::PatternCatalog;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::debug;

/// Per-request dictionary of confirmed patient names and name parts.
///
/// All stored strings are casefolded. Mutated only while pass 1 results are
/// folded in; read-only during pass 2; dropped with the request.
#[derive(Debug)]
pub struct NameCache {
    full_names: HashSet<String>,
    parts: HashSet<String>,
    stop_words: HashSet<String>,
    initialized: bool,
}

impl NameCache {
    /// Fresh empty cache using the catalog's stop-word list.
    pub fn new(catalog: &PatternCatalog) -> Self {
        Self {
            full_names: HashSet::new(),
            parts: HashSet::new(),
            stop_words: catalog.vocabulary().stop_words.clone(),
            initialized: false,
        }
    }

    /// Fold one confirmed patient name into the cache.
    ///
    /// The name is casefolded and stripped of surrounding punctuation, then
    /// split on whitespace; parts shorter than three characters or present
    /// in the stop-word list are not indexed.
    pub fn add_full_name(&mut self, name: &str) {
        let clean = name
            .trim()
            .to_lowercase()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string();

        if clean.is_empty() || self.stop_words.contains(&clean) {
            return;
        }

        let mut added = self.full_names.insert(clean.clone());

        for part in clean.split_whitespace() {
            if part.chars().count() >= 3 && !self.stop_words.contains(part) {
                added |= self.parts.insert(part.to_string());
            }
        }

        if added {
            self.initialized = true;
        }
    }

    /// True once at least one name or part has been stored.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Cached full names, casefolded.
    pub fn full_names(&self) -> &HashSet<String> {
        &self.full_names
    }

    /// Cached name parts, casefolded.
    pub fn parts(&self) -> &HashSet<String> {
        &self.parts
    }

    /// One alternation regex over all cached parts, longest alternatives
    /// first so "Johnston" is matched before "John", with word boundaries
    /// on both sides. Rebuilt per request because the cache content varies.
    pub fn part_regex(&self) -> Option<Regex> {
        if self.parts.is_empty() {
            return None;
        }

        let mut sorted: Vec<&String> = self.parts.iter().collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let source = format!(
            r"\b(?:{})\b",
            sorted
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|")
        );

        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                debug!(parts = self.parts.len(), error = %e, "Failed to compile name-part regex");
                None
            }
        }
    }

    /// Cache state counters for logging.
    pub fn summary(&self) -> (usize, usize) {
        (self.full_names.len(), self.parts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> NameCache {
        NameCache::new(PatternCatalog::global().unwrap())
    }

    #[test]
    fn test_add_full_name_indexes_parts() {
        let mut cache = cache();
        cache.add_full_name("Jane Doe");

        assert!(cache.is_initialized());
        assert!(cache.full_names().contains("jane doe"));
        assert!(cache.parts().contains("jane"));
        assert!(cache.parts().contains("doe"));
    }

    #[test]
    fn test_short_parts_are_not_indexed() {
        let mut cache = cache();
        cache.add_full_name("Jo Li Smith");

        assert!(cache.full_names().contains("jo li smith"));
        assert!(!cache.parts().contains("jo"));
        assert!(!cache.parts().contains("li"));
        assert!(cache.parts().contains("smith"));
    }

    #[test]
    fn test_stop_words_are_not_indexed() {
        let mut cache = cache();
        cache.add_full_name("The Patient");
        // whole cleaned name is built from stop words; parts are filtered
        assert!(!cache.parts().contains("the"));
        assert!(!cache.parts().contains("patient"));
    }

    #[test]
    fn test_stop_word_full_name_is_skipped() {
        let mut cache = cache();
        cache.add_full_name("Patient");
        assert!(!cache.is_initialized());
        assert!(cache.full_names().is_empty());
    }

    #[test]
    fn test_surrounding_punctuation_stripped() {
        let mut cache = cache();
        cache.add_full_name("  \"Jane Doe.\"  ");
        assert!(cache.full_names().contains("jane doe"));
    }

    #[test]
    fn test_empty_cache_has_no_part_regex() {
        let cache = cache();
        assert!(!cache.is_initialized());
        assert!(cache.part_regex().is_none());
    }

    #[test]
    fn test_part_regex_prefers_longer_alternatives() {
        let mut cache = cache();
        cache.add_full_name("John Johnston");
        let regex = cache.part_regex().unwrap();

        let m = regex.find("seen Johnston today").unwrap();
        assert_eq!(m.as_str(), "Johnston");
    }

    #[test]
    fn test_part_regex_word_boundaries() {
        let mut cache = cache();
        cache.add_full_name("Ann Lee");
        let regex = cache.part_regex().unwrap();

        assert!(regex.is_match("Ann was here"));
        assert!(!regex.is_match("Annie was here"));
        assert!(!regex.is_match("planned"));
    }
}
