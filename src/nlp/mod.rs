//! NLP abstraction and clinical annotation.
//!
//! The pipeline consumes an [`AnnotatedDocument`]: tokens with lemmas,
//! dependency edges and sentence ids, named-entity spans, and two
//! per-token clinical annotations (`provider`, `patient_role`) written by
//! the [`Annotator`]. The underlying parser is pluggable through the
//! [`NlpEngine`] trait; a deterministic rule-based backend ships with the
//! crate for environments without an external model.

pub mod annotator;
pub mod heuristic;
pub mod offset;

pub use annotator::Annotator;
pub use heuristic::HeuristicNlpEngine;
pub use offset::CharOffsets;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    /// Main verb
    Verb,
    /// Auxiliary ("was", "is", ...)
    Aux,
    /// Punctuation
    Punct,
    /// Anything else
    Word,
}

/// Dependency label on a token, relative to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepLabel {
    /// Nominal subject of an active verb
    NSubj,
    /// Nominal subject of a passive verb
    NSubjPass,
    /// Unlabelled
    None,
}

/// Named-entity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerLabel {
    /// Person names
    Person,
    /// Everything else a backend may produce
    Other,
}

/// A single token with character offsets into the source text.
#[derive(Debug, Clone)]
pub struct Token {
    /// Surface form, including an attached abbreviation period
    pub text: String,
    /// Lemma (casefolded base form)
    pub lemma: String,
    /// Coarse part of speech
    pub pos: Pos,
    /// Dependency label
    pub dep: DepLabel,
    /// Token index of the dependency head (self when unlabelled)
    pub head: usize,
    /// Sentence index, ascending
    pub sent_id: usize,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

/// A named-entity span over a token range and character range.
#[derive(Debug, Clone)]
pub struct NerSpan {
    /// Entity label
    pub label: NerLabel,
    /// First token index (inclusive)
    pub start_token: usize,
    /// Last token index (exclusive)
    pub end_token: usize,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

/// Parser output before clinical annotation.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Tokens in document order
    pub tokens: Vec<Token>,
    /// Named-entity spans in document order
    pub entities: Vec<NerSpan>,
}

/// A pluggable NLP backend.
///
/// Implementations must provide tokenization with character offsets,
/// lemmas, `nsubj`/`nsubjpass` dependency edges with head indices,
/// sentence ids, and PERSON named-entity spans. Implementations that are
/// not reentrant must serialize internally; callers never lock.
pub trait NlpEngine: Send + Sync {
    /// Backend name, reported in result metadata.
    fn name(&self) -> &str;

    /// Parse `text` into tokens and entity spans.
    fn parse(&self, text: &str) -> anyhow::Result<ParsedDocument>;
}

/// A parsed document plus clinical annotations and the offset map.
///
/// The `provider` and `patient_role` arrays are parallel to `tokens` and
/// are written only by the [`Annotator`]; everything downstream reads them.
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    text: String,
    offsets: CharOffsets,
    tokens: Vec<Token>,
    entities: Vec<NerSpan>,
    provider: Vec<bool>,
    patient_role: Vec<bool>,
}

impl AnnotatedDocument {
    pub(crate) fn new(text: String, parsed: ParsedDocument) -> Self {
        let offsets = CharOffsets::new(&text);
        let n = parsed.tokens.len();
        Self {
            text,
            offsets,
            tokens: parsed.tokens,
            entities: parsed.entities,
            provider: vec![false; n],
            patient_role: vec![false; n],
        }
    }

    /// Source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character count of the source text.
    pub fn char_len(&self) -> usize {
        self.offsets.char_len()
    }

    /// Byte/character offset map.
    pub fn offsets(&self) -> &CharOffsets {
        &self.offsets
    }

    /// Tokens in document order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Named-entity spans in document order.
    pub fn entities(&self) -> &[NerSpan] {
        &self.entities
    }

    /// True when the token at `idx` was tagged as a healthcare provider.
    pub fn is_provider(&self, idx: usize) -> bool {
        self.provider.get(idx).copied().unwrap_or(false)
    }

    /// True when the token at `idx` carries the patient role.
    pub fn has_patient_role(&self, idx: usize) -> bool {
        self.patient_role.get(idx).copied().unwrap_or(false)
    }

    /// True when any token of `entity` is provider-tagged.
    pub fn entity_has_provider(&self, entity: &NerSpan) -> bool {
        (entity.start_token..entity.end_token).any(|i| self.is_provider(i))
    }

    /// True when any token of `entity` carries the patient role.
    pub fn entity_has_patient_role(&self, entity: &NerSpan) -> bool {
        (entity.start_token..entity.end_token).any(|i| self.has_patient_role(i))
    }

    /// Casefolded lookbehind window of at most `width` characters ending at
    /// character position `start`, clamped at the start of the text.
    pub fn lookbehind_lower(&self, start: usize, width: usize) -> String {
        let from = start.saturating_sub(width);
        self.offsets.slice(&self.text, from, start).to_lowercase()
    }

    /// Surface text of a character range.
    pub fn slice(&self, char_start: usize, char_end: usize) -> &str {
        self.offsets.slice(&self.text, char_start, char_end)
    }

    pub(crate) fn set_provider(&mut self, idx: usize) {
        if let Some(slot) = self.provider.get_mut(idx) {
            *slot = true;
        }
    }

    pub(crate) fn set_patient_role(&mut self, idx: usize) {
        if let Some(slot) = self.patient_role.get_mut(idx) {
            *slot = true;
        }
    }
}
