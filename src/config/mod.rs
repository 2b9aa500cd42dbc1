//! Configuration management for Tamarack.
//!
//! TOML-based configuration with defaults for every section; an absent or
//! empty file yields the default engine settings and entity set.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{EngineConfig, LoggingConfig, RedactionConfig};
