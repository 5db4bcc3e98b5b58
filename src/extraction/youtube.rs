//! YouTube transcript retrieval.
//!
//! The watch page embeds the player response, whose `captions` object lists the available
//! caption tracks. The first track matching [`TRANSCRIPT_LANGUAGES`] (manual tracks before
//! auto-generated ones) is downloaded as timed-text XML and flattened into plain text.

use super::{ExtractionError, TextExtractor};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode, Url};
use scraper::Html;
use serde::Deserialize;
use std::sync::LazyLock;

/// English locale variants accepted for transcripts, in order of preference.
pub const TRANSCRIPT_LANGUAGES: [&str; 8] = [
    "en", "en-US", "en-GB", "en-CA", "en-AU", "en-IN", "en-uk", "en-us",
];

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

static PLAYABILITY_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""playabilityStatus":\s*\{\s*"status":\s*"([A-Z_]+)""#)
        .expect("valid playability pattern")
});
static TIMED_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid timed-text pattern"));

/// Pull the video id out of a `youtube.com/watch?v=` or `youtu.be/` URL.
pub fn extract_video_id(url: &str) -> Result<String, ExtractionError> {
    let parsed = Url::parse(url.trim()).map_err(|_| ExtractionError::InvalidVideoUrl)?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();

    let candidate = if host.contains("youtube.com") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if host.contains("youtu.be") {
        Some(parsed.path().trim_start_matches('/').to_string())
    } else {
        None
    };

    candidate
        .filter(|id| !id.is_empty())
        .ok_or(ExtractionError::InvalidVideoUrl)
}

/// Fetches English transcripts for YouTube videos.
pub struct YoutubeTranscriptExtractor {
    http: Client,
    base_url: String,
}

impl YoutubeTranscriptExtractor {
    /// Build an extractor against `www.youtube.com`.
    pub fn new() -> Result<Self, ExtractionError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build an extractor that loads watch pages from `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ExtractionError> {
        let http = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; study-helper/0.1)")
            .build()
            .map_err(|error| ExtractionError::Transcript(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, ExtractionError> {
        let response = self
            .http
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|error| ExtractionError::Transcript(error.to_string()))?;
        read_body(response).await
    }

    async fn fetch_transcript(&self, track: &CaptionTrack) -> Result<String, ExtractionError> {
        let response = self
            .http
            .get(&track.base_url)
            .send()
            .await
            .map_err(|error| ExtractionError::Transcript(error.to_string()))?;
        let xml = read_body(response).await?;
        let text = parse_timed_text(&xml);
        if text.is_empty() {
            return Err(ExtractionError::EmptyTranscript);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for YoutubeTranscriptExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let video_id = extract_video_id(url)?;
        tracing::info!(video_id = %video_id, "Fetching YouTube transcript");
        let page = self.fetch_watch_page(&video_id).await?;
        let tracks = caption_tracks(&page, &video_id)?;
        let track = select_track(&tracks).ok_or(ExtractionError::NoTranscriptFound)?;
        tracing::debug!(
            video_id = %video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );
        self.fetch_transcript(track).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, ExtractionError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ExtractionError::RateLimited);
    }
    if !status.is_success() {
        return Err(ExtractionError::Transcript(format!(
            "YouTube returned {status}"
        )));
    }
    response
        .text()
        .await
        .map_err(|error| ExtractionError::Transcript(error.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsPayload {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Read the caption track list from a watch page, classifying pages without captions.
fn caption_tracks(page: &str, video_id: &str) -> Result<Vec<CaptionTrack>, ExtractionError> {
    if let Some(status) = PLAYABILITY_STATUS
        .captures(page)
        .and_then(|captures| captures.get(1))
    {
        if !matches!(status.as_str(), "OK" | "LIVE_STREAM_OFFLINE") {
            return Err(ExtractionError::VideoUnavailable);
        }
    }

    let Some((_, captions)) = page.split_once("\"captions\":") else {
        if page.contains("class=\"g-recaptcha\"") {
            return Err(ExtractionError::RateLimited);
        }
        if !page.contains("\"playabilityStatus\":") {
            return Err(ExtractionError::VideoUnavailable);
        }
        return Err(ExtractionError::TranscriptsDisabled(video_id.to_string()));
    };

    let payload = serde_json::Deserializer::from_str(captions)
        .into_iter::<CaptionsPayload>()
        .next()
        .ok_or_else(|| ExtractionError::Transcript("caption data missing".into()))?
        .map_err(|error| {
            ExtractionError::Transcript(format!("failed to parse caption data: {error}"))
        })?;

    let tracks = payload
        .player_captions_tracklist_renderer
        .map(|renderer| renderer.caption_tracks)
        .unwrap_or_default();
    if tracks.is_empty() {
        return Err(ExtractionError::TranscriptsDisabled(video_id.to_string()));
    }
    Ok(tracks)
}

/// Pick the first accepted language that has a track, preferring manual captions within it.
fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    TRANSCRIPT_LANGUAGES.iter().find_map(|language| {
        [false, true].into_iter().find_map(|generated| {
            tracks
                .iter()
                .find(|track| track.is_generated() == generated && track.language_code == *language)
        })
    })
}

/// Flatten timed-text XML into space-separated plain text, decoding entities and markup.
fn parse_timed_text(xml: &str) -> String {
    TIMED_TEXT
        .captures_iter(xml)
        .filter_map(|captures| captures.get(1))
        .map(|segment| decode_markup(segment.as_str()))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_markup(segment: &str) -> String {
    let fragment = Html::parse_fragment(segment);
    let text: String = fragment.root_element().text().collect();
    // Timed text is frequently double-escaped (`&amp;#39;`).
    let text = if text.contains('&') {
        Html::parse_fragment(&text).root_element().text().collect()
    } else {
        text
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
