//! Sentence-aligned chunking under a character budget.
//!
//! Sentences end right after `.`, `!`, or `?` when followed by whitespace; the whitespace run
//! itself is dropped. Chunks are filled greedily and only ever split between sentences, so a
//! single sentence longer than the budget becomes one oversized chunk instead of being cut.
//! Lengths count Unicode scalar values, never bytes.

/// Split text into sentences at `.`, `!`, or `?` followed by whitespace.
///
/// Mirrors a regex split on `(?<=[.!?])\s+`: fragments are returned verbatim and may be empty
/// (for example when the input is empty or ends with a terminator plus whitespace).
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let end = index + ch.len_utf8();
        let mut resume = end;
        while let Some(&(next_index, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            resume = next_index + next.len_utf8();
            chars.next();
        }
        if resume > end {
            sentences.push(&text[start..end]);
            start = resume;
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Group sentences into chunks of at most `max_chars` characters.
///
/// Never returns an empty vector. When no sentence content is found at all (blank input), the
/// input truncated to `max_chars` is returned as the only chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        if current_len + sentence_len + 1 <= max_chars {
            current.push_str(sentence);
            current.push(' ');
            current_len += sentence_len + 1;
            continue;
        }

        push_trimmed(&mut chunks, &current);
        if sentence_len > max_chars {
            tracing::debug!(
                sentence_chars = sentence_len,
                max_chars,
                "Sentence exceeds chunk budget; keeping it whole"
            );
        }
        current.clear();
        current.push_str(sentence);
        current.push(' ');
        current_len = sentence_len + 1;
    }
    push_trimmed(&mut chunks, &current);

    if chunks.is_empty() {
        let fallback = truncate_chars(text, max_chars);
        if fallback.chars().count() < text.chars().count() {
            tracing::warn!(
                input_chars = text.chars().count(),
                max_chars,
                "No sentence chunks produced; truncating input"
            );
        }
        chunks.push(fallback);
    }
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Keep the first `max_chars` characters of `text`, respecting character boundaries.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
