//! Abstractions over the models that condense a single piece of text.
//!
//! Two interchangeable backends implement [`SummarizationClient`]: a hosted inference endpoint
//! ([`RemoteSummarizationClient`]) and a model runtime on the local host
//! ([`LocalSummarizationClient`]). The remote backend is only built when an access token is
//! configured; its failures are recoverable, while the local backend is the last resort and its
//! failures are fatal for a request.

mod local;
mod remote;

pub use local::{LocalModelHandle, LocalSummarizationClient};
pub use remote::{REMOTE_TIMEOUT, RemoteSummarizationClient};

use crate::config::Config;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while attempting a summarization call.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached (transport error, timeout, or client construction).
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Hosted model is still loading and cannot serve requests yet.
    #[error("Summarization model is loading: {0}")]
    ModelLoading(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed into a summary.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Length hints passed to the model; neither bound is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    /// Upper bound on the generated length.
    pub max_len: usize,
    /// Lower bound on the generated length.
    pub min_len: usize,
}

/// Request payload passed to a summarization backend.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Text to condense.
    pub text: String,
    /// Upper bound on the generated length.
    pub max_len: usize,
    /// Lower bound on the generated length.
    pub min_len: usize,
}

impl SummarizationRequest {
    /// Build a request for `text` with the given length hints.
    pub fn new(text: impl Into<String>, bounds: SummaryBounds) -> Self {
        Self {
            text: text.into(),
            max_len: bounds.max_len,
            min_len: bounds.min_len,
        }
    }
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Condense the request text into a shorter summary.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the hosted backend when an access token is configured.
///
/// Construction failures are logged and treated as "no remote backend" so requests still reach
/// the local model.
pub fn build_remote_client(config: &Config) -> Option<Arc<dyn SummarizationClient>> {
    let token = config.hf_api_token.as_deref()?;
    match RemoteSummarizationClient::new(&config.hf_api_url, &config.hf_model, token) {
        Ok(client) => {
            tracing::info!(model = %config.hf_model, "Remote summarization enabled");
            Some(Arc::new(client))
        }
        Err(error) => {
            tracing::warn!(error = %error, "Failed to build remote summarization client");
            None
        }
    }
}

/// Build the lazily-initialized handle to the local model described by `config`.
pub fn build_local_handle(config: &Config) -> LocalModelHandle {
    LocalModelHandle::ollama(config.ollama_url.clone(), config.local_model.clone())
}
