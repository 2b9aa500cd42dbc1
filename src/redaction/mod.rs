//! Two-pass redaction pipeline.
//!
//! # Architecture
//!
//! - [`recognizers`] - independent pass-1 detectors (patterns, checksums,
//!   clinical roles, context windows)
//! - [`cache`] - request-scoped patient name dictionary
//! - [`pass2`] - document-local dictionary recognizer over the cache
//! - [`merge`] - deterministic overlap resolution with pass precedence
//! - [`anonymizer`] - placeholder substitution
//! - [`engine`] - per-request orchestration
//! - [`service`] - the public façade
//!
//! Pass 1 favours precision through multiple independent signals; pass 2
//! recovers recall by matching every later occurrence of a name the
//! document itself confirmed as a patient.

pub mod anonymizer;
pub mod cache;
pub mod engine;
pub mod merge;
pub mod pass2;
pub mod recognizers;
pub mod service;

pub use cache::NameCache;
pub use engine::{CancellationToken, RedactionEngine};
pub use service::RedactionService;
