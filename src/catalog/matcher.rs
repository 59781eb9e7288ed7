use std::collections::HashSet;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Score two titles for "probably the same work", in `[0, 1]`.
///
/// Token overlap (`|A ∩ B| / max(|A|, |B|)`) is computed twice: once on the
/// lower-cased raw tokens and once on [`normalize_title`] output. The higher
/// ratio wins, so `"Pokémon: Horizons"` still matches `"Pokemon Horizons"`
/// while already-clean titles are not penalized. An empty token set on either
/// side scores 0.
#[must_use]
pub fn similarity_score(a: &str, b: &str) -> f64 {
    let raw_a = a.to_lowercase();
    let raw_b = b.to_lowercase();
    let raw = overlap_ratio(&tokens(&raw_a), &tokens(&raw_b));

    let norm_a = normalize_title(a);
    let norm_b = normalize_title(b);
    let normalized = overlap_ratio(&tokens(&norm_a), &tokens(&norm_b));

    raw.max(normalized)
}

/// Lower-case, strip diacritics and punctuation, collapse whitespace.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokens(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

#[allow(clippy::cast_precision_loss)]
fn overlap_ratio(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let denominator = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    a.intersection(b).count() as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Pokémon: Horizons!"), "pokemon horizons");
        assert_eq!(normalize_title("  Re:Zero   kara  "), "rezero kara");
        assert_eq!(normalize_title("Shingeki no Kyojin (2013)"), "shingeki no kyojin 2013");
    }

    #[test]
    fn test_identical_titles_score_one() {
        for title in ["One Piece", "Dr. Stone", "葬送のフリーレン", "the the the", "!!!"] {
            assert_eq!(similarity_score(title, title), 1.0, "{title}");
        }
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(similarity_score("One Piece", ""), 0.0);
        assert_eq!(similarity_score("", "One Piece"), 0.0);
        assert_eq!(similarity_score("   ", "One Piece"), 0.0);
        assert_eq!(similarity_score("", ""), 0.0);
    }

    #[test]
    fn test_diacritics_and_punctuation_match() {
        assert_eq!(similarity_score("Pokémon: Horizons", "Pokemon Horizons"), 1.0);
        assert_eq!(similarity_score("DR. STONE", "dr stone"), 1.0);
    }

    #[test]
    fn test_partial_overlap_uses_larger_token_count() {
        // 2 shared tokens out of max(2, 4)
        let score = similarity_score("Jujutsu Kaisen", "Jujutsu Kaisen Season 2");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_titles() {
        assert_eq!(similarity_score("Naruto", "Bleach"), 0.0);
    }

    #[test]
    fn test_score_is_symmetric() {
        let a = "Sousou no Frieren";
        let b = "Frieren: Beyond Journey's End";
        assert_eq!(similarity_score(a, b), similarity_score(b, a));
    }
}
