//! Description-based mood classification.

use mixforge_models::Mood;

/// Classify a free-text description into a mood.
///
/// Lowercases the text and scores each mood by how many of its keywords
/// appear as substrings ("hype" matching inside "hyperactive" is an
/// accepted imprecision). The highest non-zero score wins; ties go to the
/// first-declared mood; all zeros default to chill.
pub fn classify(description: &str) -> Mood {
    let lower = description.to_lowercase();

    let mut best = Mood::Chill;
    let mut best_score = 0usize;

    for mood in Mood::ALL {
        let score = mood
            .keywords()
            .iter()
            .filter(|keyword| lower.contains(*keyword))
            .count();
        if score > best_score {
            best = *mood;
            best_score = score;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_defaults_to_chill() {
        assert_eq!(classify(""), Mood::Chill);
        assert_eq!(classify("no matching words here"), Mood::Chill);
    }

    #[test]
    fn test_single_keyword() {
        assert_eq!(classify("soulful keys over log drums"), Mood::Deep);
        assert_eq!(classify("high energy club banger"), Mood::Party);
        assert_eq!(classify("afrobeat fusion experiment"), Mood::Fusion);
    }

    #[test]
    fn test_highest_score_wins() {
        // Two party keywords beat one chill keyword.
        assert_eq!(classify("warm bassline for the dance floor"), Mood::Party);
    }

    #[test]
    fn test_tie_breaks_by_declaration_order() {
        // One chill keyword, one deep keyword: chill declared first.
        assert_eq!(classify("mellow and reflective"), Mood::Chill);
        // One party keyword, one deep keyword: party declared before deep.
        assert_eq!(classify("emotional club track"), Mood::Party);
    }

    #[test]
    fn test_substring_matching() {
        // "hype" matches inside "hyperactive".
        assert_eq!(classify("hyperactive percussion"), Mood::Party);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("NOSTALGIC Sunset Grooves"), Mood::Chill);
    }

    #[test]
    fn test_deterministic() {
        let text = "deep soulful amapiano with gentle piano";
        assert_eq!(classify(text), classify(text));
    }
}
