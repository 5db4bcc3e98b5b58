//! Key points and practice questions derived from the final summary.

use crate::processing::chunking::split_sentences;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Glyph prefixed to every key point.
pub const BULLET_GLYPH: &str = "•";
/// Topic used when the summary contains no capitalized phrase.
pub const FALLBACK_TOPIC: &str = "the topic";

/// One to three consecutive capitalized words, e.g. `Rust`, `Borrow Checker`.
static TOPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+){0,2})\b").expect("valid topic pattern")
});

/// Bullets and questions rendered as the study artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyNotes {
    /// Key-point bullets, already prefixed with [`BULLET_GLYPH`].
    pub bullets: Vec<String>,
    /// Exactly three numbered practice questions.
    pub questions: Vec<String>,
}

impl StudyNotes {
    /// Derive notes from the final summary, keeping at most `max_points` bullets.
    pub fn derive(final_summary: &str, max_points: usize) -> Self {
        Self {
            bullets: bulletize(final_summary, max_points),
            questions: make_questions(extract_topic(final_summary)),
        }
    }
}

impl fmt::Display for StudyNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_output(&self.bullets, &self.questions))
    }
}

/// Turn the first `max_points` non-empty sentences into bullets.
pub fn bulletize(text: &str, max_points: usize) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .take(max_points)
        .map(|sentence| format!("{BULLET_GLYPH} {sentence}"))
        .collect()
}

/// First run of one to three capitalized words, or [`FALLBACK_TOPIC`].
pub fn extract_topic(text: &str) -> &str {
    TOPIC
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
        .unwrap_or(FALLBACK_TOPIC)
}

/// The three fixed practice-question templates, numbered in order.
pub fn make_questions(topic: &str) -> Vec<String> {
    vec![
        format!("1) What problem does {topic} address, and why is it important?"),
        format!("2) List two key takeaways about {topic}."),
        format!("3) How could you apply {topic} in a real scenario?"),
    ]
}

/// Render bullets and questions under their fixed headers.
pub fn format_output(bullets: &[String], questions: &[String]) -> String {
    format!(
        "Key Points:\n{}\n\nPractice Questions:\n{}",
        bullets.join("\n"),
        questions.join("\n")
    )
}
