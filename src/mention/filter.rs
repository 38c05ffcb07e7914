use super::Vocabulary;

/// Upper bound on the number of suggestions shown at once.
pub const MAX_CANDIDATES: usize = 10;

/// Suggestions for `query`: case-insensitive prefix matches in vocabulary
/// order. A query that matches no entry exactly is offered verbatim first so
/// that new tags can be created.
pub fn filter(vocabulary: &Vocabulary, query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut candidates: Vec<String> = vocabulary
        .iter()
        .filter(|entry| entry.to_lowercase().starts_with(&needle))
        .take(MAX_CANDIDATES)
        .map(str::to_string)
        .collect();

    let has_exact = candidates
        .iter()
        .any(|candidate| candidate.to_lowercase() == needle);
    if !query.is_empty() && !has_exact {
        candidates.insert(0, query.to_string());
        candidates.truncate(MAX_CANDIDATES);
    }
    candidates
}
