//! Noise removal for transcripts and scraped articles.

use regex::Regex;
use std::sync::LazyLock;

/// Bracketed annotations of up to 40 characters: `[Music]`, `[Applause]`, `[inaudible]`.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:[^\]]{1,40})\]").expect("valid bracket pattern"));
/// Timestamps such as `00:12`, `1:02:03`, or `(12:30)`.
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\b\d{1,2}:\d{2}(?::\d{2})?\)?").expect("valid timestamp pattern")
});
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Strip transcription artifacts, timestamps, and URLs, then collapse whitespace.
///
/// The result is trimmed and may be empty; callers treat an empty result as a failure.
pub fn clean(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    let text = BRACKETED.replace_all(text.trim(), " ");
    let text = TIMESTAMP.replace_all(&text, " ");
    let text = URL.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
