//! Readable text extraction from article pages.

use super::{ExtractionError, TextExtractor};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Containers tried in order; the first one holding readable blocks wins.
const CONTENT_ROOTS: [&str; 3] = ["article", "main", "body"];
const TEXT_BLOCKS: &str = "h1, h2, h3, p, li, blockquote, pre";

/// Downloads a page and keeps the text of its headings, paragraphs, and list items.
pub struct WebsiteArticleExtractor {
    http: Client,
}

impl WebsiteArticleExtractor {
    /// Build an extractor with a browser-like user agent and a fetch timeout.
    pub fn new() -> Result<Self, ExtractionError> {
        let http = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; study-helper/0.1)")
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|error| ExtractionError::Website(error.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl TextExtractor for WebsiteArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        tracing::info!(url, "Fetching article");
        let response = self
            .http
            .get(url.trim())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| ExtractionError::Website(error.to_string()))?;
        let html = response
            .text()
            .await
            .map_err(|error| ExtractionError::Website(error.to_string()))?;

        let text = article_text(&html);
        if text.is_empty() {
            return Err(ExtractionError::EmptyArticle);
        }
        tracing::debug!(url, chars = text.chars().count(), "Article text extracted");
        Ok(text)
    }
}

/// Collect readable blocks from the most specific content container, one block per line.
pub(crate) fn article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(blocks) = Selector::parse(TEXT_BLOCKS) else {
        return String::new();
    };

    CONTENT_ROOTS
        .iter()
        .filter_map(|root| Selector::parse(root).ok())
        .find_map(|root| {
            let container = document.select(&root).next()?;
            let lines: Vec<String> = container
                .select(&blocks)
                .filter(|block| !has_block_ancestor(block, &container))
                .map(|block| normalize_whitespace(&block.text().collect::<String>()))
                .filter(|line| !line.is_empty())
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        })
        .unwrap_or_default()
}

/// Skip blocks nested in another block (e.g. `<p>` inside `<li>`) so text is not repeated.
fn has_block_ancestor(block: &ElementRef<'_>, container: &ElementRef<'_>) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|element| {
            matches!(
                element.value().name(),
                "h1" | "h2" | "h3" | "p" | "li" | "blockquote" | "pre"
            )
        })
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
