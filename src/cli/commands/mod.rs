//! Command implementations

pub mod redact;
pub mod validate;
