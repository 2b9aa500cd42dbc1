//! Redaction service façade.
//!
//! Single public operation: [`RedactionService::redact`]. The service is
//! reentrant; concurrent calls share only the immutable engine, catalog,
//! and compiled patterns.

use crate::catalog::PatternCatalog;
use crate::config::RedactionConfig;
use crate::domain::{RedactionError, RedactionResult, Result};
use crate::nlp::{HeuristicNlpEngine, NlpEngine};
use crate::redaction::engine::{CancellationToken, RedactionEngine};
use std::sync::Arc;
use tracing::{error, info};

/// Thread-safe façade over the redaction engine.
#[derive(Debug)]
pub struct RedactionService {
    engine: Arc<RedactionEngine>,
}

impl RedactionService {
    /// Build the service with the bundled rule-based NLP backend.
    pub fn new(config: &RedactionConfig) -> Result<Self> {
        Self::with_nlp_engine(config, Arc::new(HeuristicNlpEngine::new()))
    }

    /// Build the service with a caller-supplied NLP backend.
    pub fn with_nlp_engine(config: &RedactionConfig, nlp: Arc<dyn NlpEngine>) -> Result<Self> {
        config
            .validate()
            .map_err(RedactionError::Configuration)?;

        let catalog = match &config.engine.pattern_library {
            Some(path) => Arc::new(PatternCatalog::from_file(path)?),
            None => Arc::new(PatternCatalog::default_catalog()?),
        };

        let engine = RedactionEngine::new(&config.engine, catalog, nlp)?;
        info!("Redaction service initialized");

        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    /// Redact one unit of clinical text.
    ///
    /// # Errors
    ///
    /// - [`RedactionError::InvalidInput`] when `text` is empty
    /// - [`RedactionError::Internal`] when the pipeline fails; no partial
    ///   redaction is returned
    pub fn redact(&self, text: &str) -> Result<RedactionResult> {
        self.redact_cancellable(text, &CancellationToken::new())
    }

    /// Redact with a cooperative cancellation token.
    pub fn redact_cancellable(
        &self,
        text: &str,
        token: &CancellationToken,
    ) -> Result<RedactionResult> {
        if text.is_empty() {
            return Err(RedactionError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        info!(text_chars = text.chars().count(), "Starting redaction request");

        self.engine.process_cancellable(text, token).map_err(|e| {
            // Metadata only: no text fragments leave the pipeline.
            error!(error_class = e.kind(), "Redaction request failed");
            e
        })
    }
}
