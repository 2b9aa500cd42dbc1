//! Domain models and types for Tamarack.
//!
//! Core domain types shared across the pipeline: the closed entity-type set,
//! detection spans, the redaction result, and the error hierarchy.

pub mod entity;
pub mod errors;
pub mod result;

pub use entity::{EntityType, RedactionMetadata, RedactionResult, Span};
pub use errors::RedactionError;
pub use result::Result;
