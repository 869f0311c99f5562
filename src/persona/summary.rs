//! Extractive summaries: the sentences of a section richest in keywords.

use lazy_static::lazy_static;
use regex::Regex;

use super::keywords::KeywordSet;

/// Sentences kept by default.
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

lazy_static! {
    /// Sentence-ending punctuation followed by whitespace.
    static ref SENTENCE_END_RE: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// Split text after `.`, `!` or `?` followed by whitespace.
///
/// The punctuation stays with its sentence, the whitespace is dropped, and
/// blank pieces are skipped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        // punctuation is a single ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences.retain(|s| !s.trim().is_empty());
    sentences
}

/// Summarize `content` with its `num_sentences` best sentences.
///
/// Sentences are scored by how many distinct keywords they contain and
/// emitted in score order, ties in reading order.
pub fn summarize(content: &str, keywords: &KeywordSet, num_sentences: usize) -> String {
    let clean = content.replace('\n', " ").replace('\u{2022}', "");

    let mut scored: Vec<(usize, &str)> = split_sentences(&clean)
        .into_iter()
        .map(|s| (keywords.count_contained(&s.to_lowercase()), s))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(num_sentences)
        .map(|(_, s)| s)
        .collect::<Vec<_>>()
        .join(" ")
}
