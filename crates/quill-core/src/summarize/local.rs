//! Extractive local summary: the leading sentences, length-capped.

use super::SummaryConfig;

/// Split text into sentences after `.`, `!` or `?` followed by whitespace.
///
/// Terminal punctuation stays with its sentence. Empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    let sentence = text[start..idx + ch.len_utf8()].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Build the local summary for already scrubbed text.
///
/// Empty input yields the placeholder. Otherwise the first
/// `local_sentences` sentences are joined with single spaces; when the
/// result exceeds `local_max_chars` it is cut, trailing whitespace is
/// removed and the ellipsis appended.
pub fn local_summary(text: &str, config: &SummaryConfig) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return config.placeholder.clone();
    }

    let joined = sentences
        .into_iter()
        .take(config.local_sentences.max(1))
        .collect::<Vec<_>>()
        .join(" ");

    if joined.chars().count() <= config.local_max_chars {
        return joined;
    }

    let mut cut: String = joined.chars().take(config.local_max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(&config.ellipsis);
    cut
}
