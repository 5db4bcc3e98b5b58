//! Study service coordinating extraction, normalization, chunking, and summarization.

use crate::{
    config::Config,
    extraction::{
        ExtractionError, TextExtractor, WebsiteArticleExtractor, YoutubeTranscriptExtractor,
    },
    processing::{
        chunking::chunk_text,
        normalize::clean,
        reduce::ChunkSummarizer,
        study::StudyNotes,
        types::{PipelineError, PipelineSettings, StudyError, has_error_prefix},
    },
    summarization::{build_local_handle, build_remote_client},
};
use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;
use uuid::Uuid;

/// Turns raw text or URLs into formatted study notes.
///
/// The service is immutable after construction; the only shared state is the lazily-created
/// local model handle held by its [`ChunkSummarizer`]. Construct it once near process start and
/// share it through an `Arc`.
pub struct StudyService {
    summarizer: ChunkSummarizer,
    youtube: Box<dyn TextExtractor>,
    website: Box<dyn TextExtractor>,
    settings: PipelineSettings,
}

/// Abstraction over the study pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// Condense raw text into key points and practice questions.
    async fn summarize_text(&self, raw: &str) -> Result<String, PipelineError>;

    /// Fetch a YouTube transcript and condense it.
    async fn summarize_youtube(&self, url: &str) -> Result<String, StudyError>;

    /// Fetch a web article and condense it.
    async fn summarize_website(&self, url: &str) -> Result<String, StudyError>;
}

impl StudyService {
    /// Build the service from configuration: remote backend when a token is set, lazily
    /// initialized local model, and the default extractors.
    pub fn new(config: &Config) -> Result<Self, ExtractionError> {
        let summarizer =
            ChunkSummarizer::new(build_remote_client(config), build_local_handle(config));
        Ok(Self::from_parts(
            summarizer,
            Box::new(YoutubeTranscriptExtractor::new()?),
            Box::new(WebsiteArticleExtractor::new()?),
            PipelineSettings::from(config),
        ))
    }

    /// Assemble the service from explicit components.
    pub fn from_parts(
        summarizer: ChunkSummarizer,
        youtube: Box<dyn TextExtractor>,
        website: Box<dyn TextExtractor>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            summarizer,
            youtube,
            website,
            settings,
        }
    }

    /// Run the full condensation pipeline over `raw`.
    ///
    /// Never panics: backend failures and panics inside the pipeline are both converted into
    /// [`PipelineError`] values.
    pub async fn summarize_text(&self, raw: &str) -> Result<String, PipelineError> {
        let span = tracing::info_span!(
            "summarize_text",
            request_id = %Uuid::new_v4(),
            input_chars = raw.chars().count()
        );
        AssertUnwindSafe(self.run_pipeline(raw))
            .catch_unwind()
            .instrument(span)
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::error!(error = %message, "Summarization pipeline panicked");
                Err(PipelineError::Unexpected(message))
            })
    }

    async fn run_pipeline(&self, raw: &str) -> Result<String, PipelineError> {
        if raw.is_empty() {
            return Err(PipelineError::NoText);
        }
        if has_error_prefix(raw) {
            return Err(PipelineError::Upstream(raw.to_string()));
        }

        let text = clean(raw);
        if text.is_empty() {
            return Err(PipelineError::EmptyAfterCleaning);
        }

        let chunks = chunk_text(&text, self.settings.max_chars);
        tracing::info!(
            cleaned_chars = text.chars().count(),
            chunks = chunks.len(),
            max_chars = self.settings.max_chars,
            "Chunked cleaned text"
        );

        let final_summary = self.summarizer.reduce(&chunks).await.map_err(|error| {
            tracing::error!(error = %error, "Local summarization failed");
            PipelineError::from(error)
        })?;
        let notes = StudyNotes::derive(&final_summary, self.settings.bullet_count);
        tracing::info!(
            bullets = notes.bullets.len(),
            summary_chars = final_summary.chars().count(),
            "Study notes ready"
        );
        Ok(notes.to_string())
    }

    async fn summarize_url(
        &self,
        extractor: &dyn TextExtractor,
        url: &str,
    ) -> Result<String, StudyError> {
        let text = extractor.extract(url).await.map_err(|error| {
            tracing::warn!(url, error = %error, "Text extraction failed");
            error
        })?;
        Ok(self.summarize_text(&text).await?)
    }
}

#[async_trait]
impl StudyApi for StudyService {
    async fn summarize_text(&self, raw: &str) -> Result<String, PipelineError> {
        StudyService::summarize_text(self, raw).await
    }

    async fn summarize_youtube(&self, url: &str) -> Result<String, StudyError> {
        self.summarize_url(self.youtube.as_ref(), url).await
    }

    async fn summarize_website(&self, url: &str) -> Result<String, StudyError> {
        self.summarize_url(self.website.as_ref(), url).await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}
