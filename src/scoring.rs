//! Keyword scoring of regulation entries

use crate::types::RegulationEntry;

/// Tokens must be longer than this (in characters) to count as keywords
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Lower-case the question and keep whitespace-separated tokens longer than
/// three characters. Duplicates are kept; each occurrence scores on its own.
pub fn extract_keywords(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Lower-cased "category subcategory description" used as the probe target
pub fn searchable_text(entry: &RegulationEntry) -> String {
    format!(
        "{} {} {}",
        entry.category, entry.subcategory, entry.description
    )
    .to_lowercase()
}

/// Number of keywords found as substrings of the entry text
pub fn score_entry(keywords: &[String], entry: &RegulationEntry) -> usize {
    if keywords.is_empty() {
        return 0;
    }

    let text = searchable_text(entry);
    keywords
        .iter()
        .filter(|kw| text.contains(kw.as_str()))
        .count()
}
