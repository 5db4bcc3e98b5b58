//! Error definitions and settings for the condensation pipeline.

use crate::config::Config;
use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use thiserror::Error;

/// Errors emitted by [`crate::processing::StudyService::summarize_text`].
///
/// Every message starts with `Error` so HTTP clients can keep detecting failures by prefix.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request carried no text at all.
    #[error("Error summarizing: no text provided.")]
    NoText,
    /// The input already was an upstream error message; it is passed through verbatim.
    #[error("{0}")]
    Upstream(String),
    /// Normalization removed everything.
    #[error("Error summarizing: extracted text was empty after cleaning.")]
    EmptyAfterCleaning,
    /// The local model failed after any remote fallback.
    #[error("Error summarizing: {0}")]
    Summarization(#[from] SummarizationClientError),
    /// Anything else that went wrong inside the pipeline, including panics.
    #[error("Error summarizing: {0}")]
    Unexpected(String),
}

/// Errors emitted by the URL-driven flows: extraction first, then the pipeline.
#[derive(Debug, Error)]
pub enum StudyError {
    /// Text could not be extracted from the URL.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Extraction succeeded but the pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Tunables for chunking and bullet derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Character budget per chunk.
    pub max_chars: usize,
    /// Maximum number of key-point bullets.
    pub bullet_count: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_chars: crate::config::DEFAULT_CHUNK_MAX_CHARS,
            bullet_count: crate::config::DEFAULT_BULLET_COUNT,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_chars: config.chunk_max_chars,
            bullet_count: config.bullet_count,
        }
    }
}

/// Whether `text` starts with `error`, ignoring ASCII case.
pub fn has_error_prefix(text: &str) -> bool {
    text.get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("error"))
}
