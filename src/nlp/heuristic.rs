//! Deterministic rule-based NLP backend.
//!
//! A minimal fallback for environments without an external model: regular
//! tokenization with abbreviation handling, suffix lemmatization with a
//! clinical verb lexicon, capitalized-run PERSON detection, and shallow
//! subject attachment for active and passive clauses. It does not attempt
//! full parsing; production deployments plug a model-backed engine through
//! the [`NlpEngine`](crate::nlp::NlpEngine) trait.

use crate::nlp::{DepLabel, NerLabel, NerSpan, NlpEngine, ParsedDocument, Pos, Token};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Abbreviations that keep a trailing period attached to the token.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "dr", "mr", "mrs", "ms", "prof", "st", "jr", "sr", "rn", "md", "np", "no", "vs",
    ]
    .into_iter()
    .collect()
});

/// Auxiliaries that signal a passive construction when directly before a
/// participle.
static BE_AUX: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["was", "were", "is", "are", "am", "be", "been", "being"]
        .into_iter()
        .collect()
});

/// Inflected clinical verb forms mapped to their lemmas.
static VERB_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("complained", "complain"),
        ("complains", "complain"),
        ("complaining", "complain"),
        ("reported", "report"),
        ("reports", "report"),
        ("reporting", "report"),
        ("presented", "present"),
        ("presents", "present"),
        ("presenting", "present"),
        ("admitted", "admit"),
        ("discharged", "discharge"),
        ("diagnosed", "diagnose"),
        ("treated", "treat"),
        ("treats", "treat"),
        ("treating", "treat"),
        ("examined", "examine"),
        ("examines", "examine"),
        ("examining", "examine"),
        ("assessed", "assess"),
        ("transferred", "transfer"),
        ("referred", "refer"),
        ("prescribed", "prescribe"),
        ("scheduled", "schedule"),
        ("seen", "see"),
        ("saw", "see"),
        ("sees", "see"),
        ("stated", "state"),
        ("states", "state"),
        ("described", "describe"),
        ("describes", "describe"),
        ("denied", "deny"),
        ("denies", "deny"),
        ("experienced", "experience"),
        ("experiences", "experience"),
        ("suffered", "suffer"),
        ("suffers", "suffer"),
        ("arrived", "arrive"),
        ("arrives", "arrive"),
        ("visited", "visit"),
        ("visits", "visit"),
    ]
    .into_iter()
    .collect()
});

/// Capitalized words that are never treated as name parts.
static COMMON_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "he", "she", "it", "they", "we",
        "you", "i", "his", "her", "their", "its", "my", "our", "your", "who", "whom", "which",
        "what", "when", "where", "why", "how", "and", "or", "but", "if", "then", "than",
        "after", "before", "during", "while", "card", "patient", "name", "dob", "hcn", "mrn",
        "phone", "email", "address", "date", "birth", "health", "number", "hospital", "clinic",
        "ward", "unit", "room", "visit", "history", "notes", "report", "summary", "monday",
        "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
        "february", "march", "april", "may", "june", "july", "august", "september", "october",
        "november", "december",
    ]
    .into_iter()
    .collect()
});

/// Words skipped while searching backwards for a clause subject.
static SUBJECT_SKIP: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "then", "after", "before", "to", "of", "in",
        "on", "at", "by", "with", "for", "not", "had", "has", "have",
    ]
    .into_iter()
    .collect()
});

/// Rule-based [`NlpEngine`] implementation.
#[derive(Debug, Default)]
pub struct HeuristicNlpEngine;

impl HeuristicNlpEngine {
    /// Create the engine. Construction never fails and loads no model.
    pub fn new() -> Self {
        Self
    }
}

impl NlpEngine for HeuristicNlpEngine {
    fn name(&self) -> &str {
        "heuristic-en-clinical"
    }

    fn parse(&self, text: &str) -> anyhow::Result<ParsedDocument> {
        let mut tokens = tokenize(text);
        assign_sentences(&mut tokens);
        attach_subjects(&mut tokens);
        let entities = detect_person_runs(&tokens);
        Ok(ParsedDocument { tokens, entities })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}' || c == '-'
}

/// Scan `text` into tokens with character offsets. Trailing periods stay
/// attached to known abbreviations ("Dr.", "no.") and are otherwise
/// separate punctuation tokens.
fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_alphanumeric() {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let mut surface: String = chars[start..i].iter().collect();

            // Keep the period on abbreviations so "Dr." is one token and
            // does not end the sentence.
            if i < chars.len()
                && chars[i] == '.'
                && ABBREVIATIONS.contains(surface.to_lowercase().as_str())
            {
                surface.push('.');
                i += 1;
            }

            let end = i;
            tokens.push(make_token(surface, start, end));
        } else {
            tokens.push(make_token(c.to_string(), i, i + 1));
            i += 1;
        }
    }

    tokens
}

fn make_token(surface: String, start: usize, end: usize) -> Token {
    let lower = surface.to_lowercase();
    let pos = if surface.chars().count() == 1 && !surface.chars().next().unwrap().is_alphanumeric()
    {
        Pos::Punct
    } else if BE_AUX.contains(lower.as_str()) {
        Pos::Aux
    } else if is_verb_form(&lower) {
        Pos::Verb
    } else {
        Pos::Word
    };

    let lemma = lemma_of(&lower);

    Token {
        text: surface,
        lemma,
        pos,
        dep: DepLabel::None,
        head: 0,
        sent_id: 0,
        start,
        end,
    }
}

fn is_verb_form(lower: &str) -> bool {
    VERB_FORMS.contains_key(lower) || (lower.len() > 4 && lower.ends_with("ed"))
}

/// Lemmatize via the clinical lexicon, falling back to suffix stripping.
fn lemma_of(lower: &str) -> String {
    if let Some(lemma) = VERB_FORMS.get(lower) {
        return (*lemma).to_string();
    }

    let n = lower.len();
    if n > 4 && (lower.ends_with("ies") || lower.ends_with("ied")) {
        return format!("{}y", &lower[..n - 3]);
    }
    if n > 5 && lower.ends_with("ing") {
        return collapse_double(&lower[..n - 3]);
    }
    if n > 4 && lower.ends_with("ed") {
        return collapse_double(&lower[..n - 2]);
    }
    if n > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
        return lower[..n - 1].to_string();
    }
    lower.to_string()
}

fn collapse_double(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !matches!(bytes[n - 1], b'l' | b's') {
        stem[..n - 1].to_string()
    } else {
        stem.to_string()
    }
}

/// Assign ascending sentence ids; ".", "!" and "?" end a sentence.
fn assign_sentences(tokens: &mut [Token]) {
    let mut sent = 0;
    for token in tokens.iter_mut() {
        token.sent_id = sent;
        if matches!(token.text.as_str(), "." | "!" | "?") {
            sent += 1;
        }
    }
}

/// Attach `nsubj`/`nsubjpass` edges: for each verb, look for a directly
/// preceding be-auxiliary (passive) and then search backwards in the same
/// sentence for the nearest subject candidate.
fn attach_subjects(tokens: &mut [Token]) {
    let verb_indices: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.pos == Pos::Verb)
        .map(|(i, _)| i)
        .collect();

    for v in verb_indices {
        let sent = tokens[v].sent_id;

        // Passive: "was admitted", allowing one intervening adverb or "not".
        let mut aux = None;
        let mut j = v;
        let mut skipped = 0;
        while j > 0 && skipped <= 1 {
            j -= 1;
            if tokens[j].sent_id != sent {
                break;
            }
            let lower = tokens[j].text.to_lowercase();
            if tokens[j].pos == Pos::Aux {
                aux = Some(j);
                break;
            }
            if lower == "not" || lower.ends_with("ly") {
                skipped += 1;
                continue;
            }
            break;
        }

        let (dep, search_from) = match aux {
            Some(a) => (DepLabel::NSubjPass, a),
            None => (DepLabel::NSubj, v),
        };

        let mut k = search_from;
        while k > 0 {
            k -= 1;
            if tokens[k].sent_id != sent {
                break;
            }
            if is_subject_candidate(&tokens[k]) {
                if tokens[k].dep == DepLabel::None {
                    tokens[k].dep = dep;
                    tokens[k].head = v;
                }
                break;
            }
        }
    }
}

fn is_subject_candidate(token: &Token) -> bool {
    if token.pos != Pos::Word {
        return false;
    }
    let lower = token.text.to_lowercase();
    !SUBJECT_SKIP.contains(lower.as_str())
        && token.text.chars().next().is_some_and(|c| c.is_alphabetic())
}

/// A token can start or extend a PERSON run when it looks like a proper
/// name: leading uppercase, at least one lowercase, purely alphabetic
/// (plus apostrophes/hyphens), and not a known common word or verb form.
fn is_name_candidate(token: &Token) -> bool {
    if token.text.ends_with('.') {
        return false;
    }
    let mut chars = token.text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_uppercase() {
        return false;
    }
    if !token.text.chars().any(|c| c.is_lowercase()) {
        return false;
    }
    if !token
        .text
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || c == '\u{2019}' || c == '-')
    {
        return false;
    }

    let lower = token.text.to_lowercase();
    !COMMON_WORDS.contains(lower.as_str()) && !VERB_FORMS.contains_key(lower.as_str())
}

/// Group consecutive name candidates into PERSON spans.
fn detect_person_runs(tokens: &[Token]) -> Vec<NerSpan> {
    let mut entities = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        let candidate = is_name_candidate(token);

        match (candidate, run_start) {
            (true, None) => run_start = Some(i),
            (true, Some(_)) => {}
            (false, Some(start)) => {
                entities.push(person_span(tokens, start, i));
                run_start = None;
            }
            (false, None) => {}
        }
    }

    if let Some(start) = run_start {
        entities.push(person_span(tokens, start, tokens.len()));
    }

    entities
}

fn person_span(tokens: &[Token], start_token: usize, end_token: usize) -> NerSpan {
    NerSpan {
        label: NerLabel::Person,
        start_token,
        end_token,
        start: tokens[start_token].start,
        end: tokens[end_token - 1].end,
    }
}
