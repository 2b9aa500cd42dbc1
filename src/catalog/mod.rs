//! Pattern catalog: regexes, vocabularies, and placeholders.
//!
//! The catalog is loaded once from a declarative TOML library and is
//! immutable afterwards. A default library is embedded in the crate; a
//! custom file can be supplied through configuration. Compiled regexes are
//! shared process-wide and are safe for unsynchronized concurrent reads.

use crate::domain::{EntityType, RedactionError, Result};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Pattern definition as it appears in the TOML library.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Rule name, unique within its entity type
    pub name: String,
    /// Regex source (Rust `regex` syntax, no lookaround)
    pub regex: String,
    /// Confidence score (0.0 - 1.0)
    pub score: f32,
}

/// Compiled pattern with metadata.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Rule name from the library
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Confidence score
    pub score: f32,
}

#[derive(Debug, Deserialize)]
struct RawVocabulary {
    healthcare_titles: Vec<String>,
    patient_verbs_active: Vec<String>,
    patient_verbs_passive: Vec<String>,
    patient_context_keywords: Vec<String>,
    credit_card_context: Vec<String>,
    stop_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawProvince {
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawLibrary {
    vocabulary: RawVocabulary,
    patterns: HashMap<String, Vec<PatternDefinition>>,
    provinces: HashMap<String, RawProvince>,
}

/// Vocabulary lists from the pattern library, casefolded at load.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Healthcare titles, lowercase, without trailing periods
    pub healthcare_titles: HashSet<String>,
    /// Active-voice patient verb lemmas
    pub patient_verbs_active: HashSet<String>,
    /// Passive-voice patient verb lemmas
    pub patient_verbs_passive: HashSet<String>,
    /// Keywords that mark a preceding-context patient mention
    pub patient_context_keywords: Vec<String>,
    /// Context keywords near credit-card numbers
    pub credit_card_context: Vec<String>,
    /// Tokens excluded from the name cache
    pub stop_words: HashSet<String>,
}

/// Immutable pattern catalog shared for the process lifetime.
#[derive(Debug)]
pub struct PatternCatalog {
    patterns: HashMap<EntityType, Vec<CompiledRule>>,
    vocabulary: Vocabulary,
    provinces: HashMap<String, Vec<String>>,
    placeholders: HashMap<EntityType, String>,
    title_regex: Regex,
    context_keyword_regex: Regex,
}

static GLOBAL_CATALOG: OnceCell<PatternCatalog> = OnceCell::new();

/// Default pattern library embedded in the crate.
const DEFAULT_LIBRARY: &str = include_str!("../../patterns/redaction_patterns.toml");

impl PatternCatalog {
    /// Load the catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RedactionError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Load the catalog from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawLibrary = toml::from_str(content).map_err(|e| {
            RedactionError::Configuration(format!("Failed to parse pattern library: {e}"))
        })?;

        let vocabulary = Vocabulary {
            healthcare_titles: casefold_set(&raw.vocabulary.healthcare_titles),
            patient_verbs_active: casefold_set(&raw.vocabulary.patient_verbs_active),
            patient_verbs_passive: casefold_set(&raw.vocabulary.patient_verbs_passive),
            patient_context_keywords: casefold_list(&raw.vocabulary.patient_context_keywords),
            credit_card_context: casefold_list(&raw.vocabulary.credit_card_context),
            stop_words: casefold_set(&raw.vocabulary.stop_words),
        };

        if vocabulary.healthcare_titles.is_empty() {
            return Err(RedactionError::Configuration(
                "vocabulary.healthcare_titles must not be empty".to_string(),
            ));
        }

        let mut patterns: HashMap<EntityType, Vec<CompiledRule>> = HashMap::new();
        for (label, defs) in &raw.patterns {
            let entity = EntityType::from_label(label).ok_or_else(|| {
                RedactionError::Configuration(format!("Unknown entity type in patterns: {label}"))
            })?;

            let mut rules = Vec::with_capacity(defs.len());
            for def in defs {
                let regex = Regex::new(&def.regex).map_err(|e| {
                    RedactionError::Configuration(format!(
                        "Invalid regex in pattern '{}': {e}",
                        def.name
                    ))
                })?;
                rules.push(CompiledRule {
                    name: def.name.clone(),
                    regex,
                    score: def.score.clamp(0.0, 1.0),
                });
            }
            // Deterministic evaluation order within an entity type.
            rules.sort_by(|a, b| a.name.cmp(&b.name));
            patterns.insert(entity, rules);
        }

        for entity in EntityType::ALL {
            if !patterns.contains_key(&entity) && entity != EntityType::PatientName {
                warn!(entity = entity.label(), "No patterns configured; recognizer will be skipped");
            }
        }

        let provinces = raw
            .provinces
            .into_iter()
            .map(|(code, p)| (code, casefold_list(&p.keywords)))
            .collect();

        let placeholders = EntityType::ALL
            .iter()
            .map(|e| (*e, e.placeholder()))
            .collect();

        let title_regex = whole_word_alternation(&vocabulary.healthcare_titles)?;
        let context_keyword_regex =
            whole_word_alternation_list(&vocabulary.patient_context_keywords)?;

        info!(
            pattern_types = patterns.len(),
            titles = vocabulary.healthcare_titles.len(),
            stop_words = vocabulary.stop_words.len(),
            "Pattern catalog loaded"
        );

        Ok(Self {
            patterns,
            vocabulary,
            provinces,
            placeholders,
            title_regex,
            context_keyword_regex,
        })
    }

    /// Catalog built from the embedded default library.
    pub fn default_catalog() -> Result<Self> {
        Self::from_toml(DEFAULT_LIBRARY)
    }

    /// Process-wide catalog, initialized on first use from the embedded
    /// default library. Concurrent reads are lock-free after initialization.
    pub fn global() -> Result<&'static PatternCatalog> {
        GLOBAL_CATALOG.get_or_try_init(Self::default_catalog)
    }

    /// Rules configured for an entity type, empty when none.
    pub fn rules_for(&self, entity: EntityType) -> &[CompiledRule] {
        self.patterns.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the entity type has at least one configured pattern.
    pub fn has_patterns(&self, entity: EntityType) -> bool {
        !self.rules_for(entity).is_empty()
    }

    /// Vocabulary lists.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Context keywords for a province code, empty when unknown.
    pub fn province_keywords(&self, code: &str) -> &[String] {
        self.provinces.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Placeholder literal for an entity type.
    pub fn placeholder(&self, entity: EntityType) -> &str {
        self.placeholders
            .get(&entity)
            .map(String::as_str)
            .unwrap_or("<REDACTED>")
    }

    /// Whole-word alternation over healthcare titles, for lookbehind
    /// window checks against casefolded text.
    pub fn title_regex(&self) -> &Regex {
        &self.title_regex
    }

    /// Whole-word alternation over patient context keywords, for lookbehind
    /// window checks against casefolded text.
    pub fn context_keyword_regex(&self) -> &Regex {
        &self.context_keyword_regex
    }
}

fn casefold_set(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|s| s.trim().trim_end_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn casefold_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn whole_word_alternation(words: &HashSet<String>) -> Result<Regex> {
    let mut sorted: Vec<&String> = words.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    build_alternation(sorted.into_iter().map(String::as_str))
}

fn whole_word_alternation_list(words: &[String]) -> Result<Regex> {
    let mut sorted: Vec<&str> = words.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    build_alternation(sorted.into_iter())
}

fn build_alternation<'a>(words: impl Iterator<Item = &'a str>) -> Result<Regex> {
    let escaped: Vec<String> = words.map(|w| regex::escape(w)).collect();
    let source = if escaped.is_empty() {
        // Never matches; keeps callers branch-free.
        r"\b\B".to_string()
    } else {
        format!(r"\b(?:{})\b", escaped.join("|"))
    };

    RegexBuilder::new(&source)
        .build()
        .map_err(|e| RedactionError::Configuration(format!("Invalid vocabulary regex: {e}")))
}
