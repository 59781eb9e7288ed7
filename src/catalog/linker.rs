use crate::catalog::{
    matcher::{normalize_title, similarity_score},
    types::{MatchResult, Named, Titled},
};
use std::collections::HashSet;

/// Pick the candidate whose title scores highest against `target`.
///
/// Only a strictly higher score replaces the current best, so ties keep the
/// first-seen candidate. Returns `None` when nothing scores above zero.
pub fn link_by_title<C: Titled>(
    target: &str,
    candidates: impl IntoIterator<Item = C>,
) -> Option<MatchResult<C>> {
    let mut best: Option<MatchResult<C>> = None;

    for candidate in candidates {
        let score = similarity_score(target, candidate.title());
        let current = best.as_ref().map_or(0.0, |m| m.score);
        if score > current {
            best = Some(MatchResult { candidate, score });
        }
    }

    best
}

/// Pick the first candidate whose name and `target` contain one another.
///
/// With a `filter` (an anime or manga title), candidates are first narrowed to
/// those listing a matching appearance. If that leaves nothing, the link fails
/// even when an unfiltered name match exists.
pub fn link_by_name<C: Named>(
    target: &str,
    candidates: impl IntoIterator<Item = C>,
    filter: Option<&str>,
) -> Option<MatchResult<C>> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty());

    let mut eligible: Vec<C> = match filter {
        Some(filter) => candidates
            .into_iter()
            .filter(|c| c.appearances().iter().any(|a| contains_either(a, filter)))
            .collect(),
        None => candidates.into_iter().collect(),
    };

    let index = eligible
        .iter()
        .position(|c| contains_either(c.name(), target))?;
    let candidate = eligible.swap_remove(index);
    let score = similarity_score(target, candidate.name());

    Some(MatchResult { candidate, score })
}

/// Order-independent mutual containment after normalization.
///
/// True when either compacted string (whitespace and punctuation removed)
/// contains the other, or when either token set contains the other, so
/// `"Uzumaki Naruto"` matches `"Naruto Uzumaki"` and `"Levi-heichou"` matches
/// `"Levi"`. Blank input never matches.
#[must_use]
pub fn contains_either(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let compact_a: String = a.split_whitespace().collect();
    let compact_b: String = b.split_whitespace().collect();
    if compact_a.contains(&compact_b) || compact_b.contains(&compact_a) {
        return true;
    }

    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();
    tokens_a.is_subset(&tokens_b) || tokens_b.is_subset(&tokens_a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CandidateName, CandidateTitle};

    #[test]
    fn test_link_by_title_empty_candidates() {
        let linked = link_by_title("One Piece", Vec::<CandidateTitle>::new());
        assert!(linked.is_none());
    }

    #[test]
    fn test_link_by_title_picks_highest() {
        let candidates = vec![
            CandidateTitle::new("One Piece Film: Red", "1"),
            CandidateTitle::new("One Piece", "37854"),
            CandidateTitle::new("One Punch Man", "63926"),
        ];

        let linked = link_by_title("One Piece", candidates).unwrap();

        assert_eq!(linked.candidate.catalog_id, "37854");
        assert_eq!(linked.score, 1.0);
    }

    #[test]
    fn test_link_by_title_ties_keep_first() {
        let candidates = vec![
            CandidateTitle::new("Spy Family", "a"),
            CandidateTitle::new("Spy x Family", "b"),
            CandidateTitle::new("Family Spy", "c"),
        ];

        let linked = link_by_title("Spy Family", candidates).unwrap();

        assert_eq!(linked.candidate.catalog_id, "a");
    }

    #[test]
    fn test_link_by_title_zero_scores_are_no_match() {
        let candidates = vec![CandidateTitle::new("Bleach", "1")];
        assert!(link_by_title("Naruto", candidates).is_none());
    }

    #[test]
    fn test_link_by_name_order_independent() {
        let candidates = vec![CandidateName::new("Uzumaki Naruto", "17")];

        let linked = link_by_name("Naruto Uzumaki", candidates, None).unwrap();

        assert_eq!(linked.candidate.catalog_id, "17");
    }

    #[test]
    fn test_link_by_name_tolerates_suffixes() {
        let candidates = vec![
            CandidateName::new("Ackerman, Mikasa", "40881"),
            CandidateName::new("Levi", "45627"),
        ];

        let linked = link_by_name("Levi-heichou", candidates, None).unwrap();

        assert_eq!(linked.candidate.catalog_id, "45627");
    }

    #[test]
    fn test_link_by_name_filter_narrows() {
        let candidates = vec![
            CandidateName::new("Senku Ishigami", "1").with_appearance("Dr. Stone: New World"),
            CandidateName::new("Senku Ishigami", "2").with_appearance("Dr. STONE: Stone Wars"),
        ];

        let linked = link_by_name("Senku Ishigami", candidates, Some("Dr Stone Stone Wars")).unwrap();

        assert_eq!(linked.candidate.catalog_id, "2");
    }

    #[test]
    fn test_link_by_name_filter_eliminating_all_fails() {
        let candidates = vec![CandidateName::new("Light Yagami", "80").with_appearance("Death Note")];

        assert!(link_by_name("Light Yagami", candidates.clone(), None).is_some());
        assert!(link_by_name("Light Yagami", candidates, Some("Bleach")).is_none());
    }

    #[test]
    fn test_link_by_name_blank_filter_is_ignored() {
        let candidates = vec![CandidateName::new("Gon Freecss", "30")];
        assert!(link_by_name("Gon Freecss", candidates, Some("  ")).is_some());
    }

    #[test]
    fn test_contains_either() {
        assert!(contains_either("Naruto", "naruto uzumaki"));
        assert!(contains_either("Uzumaki Naruto", "Naruto Uzumaki"));
        assert!(!contains_either("", "Naruto"));
        assert!(!contains_either("Sasuke", "Naruto"));
    }
}
