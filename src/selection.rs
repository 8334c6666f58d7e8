//! Relevance ranking over the corpus

use crate::scoring::{extract_keywords, score_entry};
use crate::types::{RegulationEntry, ScoredMatch};
use tracing::debug;

/// Number of entries returned when the caller does not choose
pub const DEFAULT_MATCH_LIMIT: usize = 3;

/// Score every entry against the question and return the matches with
/// score >= 1, best first. Ties keep corpus order.
pub fn rank_entries<'a>(
    question: &str,
    entries: impl IntoIterator<Item = &'a RegulationEntry>,
) -> Vec<ScoredMatch<'a>> {
    let keywords = extract_keywords(question);
    if keywords.is_empty() {
        debug!("No keywords in question, nothing to match");
        return Vec::new();
    }

    let mut matches: Vec<ScoredMatch<'a>> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let score = score_entry(&keywords, entry);
            (score > 0).then_some(ScoredMatch {
                entry,
                score,
                position,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Top `limit` entries for the question, best first. Never fails; an empty
/// result just means nothing matched.
pub fn match_entries<'a>(
    question: &str,
    entries: impl IntoIterator<Item = &'a RegulationEntry>,
    limit: usize,
) -> Vec<RegulationEntry> {
    let ranked = rank_entries(question, entries);

    debug!(
        "Matched {} entries (limit {}): {:?}",
        ranked.len(),
        limit,
        ranked
            .iter()
            .take(limit)
            .map(|m| (m.position, m.score))
            .collect::<Vec<_>>()
    );

    ranked
        .into_iter()
        .take(limit)
        .map(|m| m.entry.clone())
        .collect()
}
