//! Plain-text extraction from YouTube transcripts and web articles.
//!
//! Extractors either return the extracted text or an [`ExtractionError`] whose message starts
//! with `Error extracting ...`, which the HTTP surface reports as a client error.

mod website;
mod youtube;

pub use website::WebsiteArticleExtractor;
pub use youtube::{TRANSCRIPT_LANGUAGES, YoutubeTranscriptExtractor, extract_video_id};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced while extracting text from a URL.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// URL did not carry a recognizable YouTube video id.
    #[error("Error extracting YouTube transcript: Invalid YouTube URL: couldn't find a video id")]
    InvalidVideoUrl,
    /// Captions are turned off for the video.
    #[error("Error extracting YouTube transcript: transcripts are disabled for this video ({0}).")]
    TranscriptsDisabled(String),
    /// Captions exist but none in an accepted English locale.
    #[error(
        "Error extracting YouTube transcript: no English transcript (manual or auto) was found."
    )]
    NoTranscriptFound,
    /// Video is private, removed, or otherwise not playable.
    #[error("Error extracting YouTube transcript: the video is unavailable.")]
    VideoUnavailable,
    /// YouTube is throttling requests.
    #[error("Error extracting YouTube transcript: rate-limited by YouTube. Try again in a bit.")]
    RateLimited,
    /// Transcript downloaded but contained no text.
    #[error("Error extracting YouTube transcript: transcript was empty.")]
    EmptyTranscript,
    /// Any other transcript failure (transport, unexpected page layout).
    #[error("Error extracting YouTube transcript: {0}")]
    Transcript(String),
    /// Article page yielded no readable text.
    #[error("Error extracting website text: page returned no readable content.")]
    EmptyArticle,
    /// Article page could not be fetched or read.
    #[error("Error extracting website text: {0}")]
    Website(String),
}

/// Interface implemented by URL-to-text extractors.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Fetch `url` and return its plain text.
    async fn extract(&self, url: &str) -> Result<String, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::has_error_prefix;

    #[test]
    fn extraction_errors_have_distinct_sentinel_messages() {
        let errors = [
            ExtractionError::InvalidVideoUrl,
            ExtractionError::TranscriptsDisabled("abc".into()),
            ExtractionError::NoTranscriptFound,
            ExtractionError::VideoUnavailable,
            ExtractionError::RateLimited,
            ExtractionError::EmptyTranscript,
            ExtractionError::Transcript("boom".into()),
            ExtractionError::EmptyArticle,
            ExtractionError::Website("boom".into()),
        ];
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        for message in &messages {
            assert!(has_error_prefix(message), "{message}");
        }
        let unique: std::collections::HashSet<_> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
    }
}
