// Tamarack - Canadian Clinical Text Redaction Engine
// Copyright (c) 2026 Tamarack Contributors
// Licensed under the MIT License

//! # Tamarack - Canadian Clinical PII/PHI Redaction
//!
//! Tamarack is a context-aware redaction engine for Canadian clinical
//! narratives. Patient-identifying tokens and sensitive identifiers are
//! replaced by fixed placeholder tags while healthcare provider names and
//! institutional references are preserved.
//!
//! ## Overview
//!
//! The engine runs a two-pass pipeline per request:
//!
//! - **Pass 1 (precision)**: independent recognizers over the annotated
//!   text - configured regex patterns with Luhn and provincial checksum
//!   gating, explicit patient-name form lines, grammatical patient roles
//!   from dependency edges, and lookbehind context keywords.
//! - **Pass 2 (recall)**: every patient name confirmed by pass 1 seeds a
//!   request-scoped dictionary; later occurrences of those names and
//!   their parts are matched across the whole document, with a healthcare
//!   title lookbehind guarding provider mentions.
//!
//! Overlaps resolve deterministically (pass 1 beats pass 2, then score,
//! length, position, rule name) and placeholders like `<PATIENT_NAME>`
//! are substituted left to right.
//!
//! ## Architecture
//!
//! - [`redaction`] - the two-pass pipeline, merger, and service façade
//! - [`nlp`] - NLP backend trait, clinical annotator, bundled heuristic
//!   backend
//! - [`catalog`] - pattern library (regexes, vocabularies, placeholders)
//! - [`validators`] - Luhn and provincial health-number checks
//! - [`domain`] - entity types, spans, results, and errors
//! - [`config`] - TOML configuration
//! - [`logging`] - structured logging setup
//! - [`cli`] - command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use tamarack::config::RedactionConfig;
//! use tamarack::redaction::RedactionService;
//!
//! # fn main() -> Result<(), tamarack::domain::RedactionError> {
//! let service = RedactionService::new(&RedactionConfig::default())?;
//! let result = service.redact("The patient John Smith complained of chest pain.")?;
//! assert_eq!(
//!     result.redacted,
//!     "The patient <PATIENT_NAME> complained of chest pain."
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! [`RedactionService`](redaction::RedactionService) is reentrant: the
//! catalog and compiled patterns are process-wide and immutable, and each
//! call owns its name cache, so concurrent requests cannot contaminate
//! each other.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod nlp;
pub mod redaction;
pub mod validators;
