//! Two-pass reduction of chunks into one final summary.

use crate::processing::chunking::truncate_chars;
use crate::summarization::{
    LocalModelHandle, SummarizationClient, SummarizationClientError, SummarizationRequest,
    SummaryBounds,
};
use std::sync::Arc;

/// Length hints for the per-chunk pass.
pub const CHUNK_BOUNDS: SummaryBounds = SummaryBounds {
    max_len: 160,
    min_len: 60,
};
/// Length hints for the final pass over the combined chunk summaries.
pub const FINAL_BOUNDS: SummaryBounds = SummaryBounds {
    max_len: 200,
    min_len: 80,
};
/// Hard cap on the combined chunk summaries fed into the final pass.
pub const MAX_COMBINED_CHARS: usize = 4000;

/// Drives the summarization backends over every chunk, then condenses the joined results.
///
/// Each call tries the remote backend first (when one is configured) and retries the same
/// input on the local model with identical bounds when the remote call fails. Only a local
/// failure is returned to the caller.
pub struct ChunkSummarizer {
    remote: Option<Arc<dyn SummarizationClient>>,
    local: LocalModelHandle,
}

impl ChunkSummarizer {
    /// Build a summarizer over an optional remote backend and the shared local model handle.
    pub fn new(remote: Option<Arc<dyn SummarizationClient>>, local: LocalModelHandle) -> Self {
        Self { remote, local }
    }

    /// Summarize every chunk in order, then run the final pass over the joined summaries.
    pub async fn reduce(&self, chunks: &[String]) -> Result<String, SummarizationClientError> {
        let mut summaries = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let summary = self.summarize_once(chunk, CHUNK_BOUNDS).await?;
            tracing::debug!(
                chunk = index,
                input_chars = chunk.chars().count(),
                summary_chars = summary.chars().count(),
                "Chunk summarized"
            );
            summaries.push(summary);
        }

        let combined = truncate_chars(&summaries.join(" "), MAX_COMBINED_CHARS);
        tracing::debug!(
            chunks = summaries.len(),
            combined_chars = combined.chars().count(),
            "Running final summarization pass"
        );
        self.summarize_once(&combined, FINAL_BOUNDS).await
    }

    async fn summarize_once(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, SummarizationClientError> {
        let request = SummarizationRequest::new(text, bounds);
        if let Some(remote) = &self.remote {
            match remote.generate_summary(request.clone()).await {
                Ok(summary) => return Ok(summary),
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        max_len = bounds.max_len,
                        "Remote summarization failed; falling back to local model"
                    );
                }
            }
        }

        let local = self.local.get().await?;
        local.generate_summary(request).await
    }
}
