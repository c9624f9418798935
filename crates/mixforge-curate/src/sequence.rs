//! Track ordering for listening flow.

use mixforge_models::Track;

/// Order tracks for smooth listening flow: calm moods first, then by
/// tempo within each mood bucket.
///
/// A stable total-order sort on `(mood rank, effective tempo)`; tracks
/// with unknown tempo sort as 100 within their bucket. No pairwise
/// transition cost is modeled.
pub fn order_for_flow(mut tracks: Vec<Track>) -> Vec<Track> {
    tracks.sort_by_key(|t| (t.mood.rank(), t.effective_tempo()));
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixforge_models::Mood;

    fn track(slug: &str, mood: Mood, tempo: u32) -> Track {
        let mut t = Track::new(slug, slug.to_uppercase(), 180.0);
        t.mood = mood;
        t.tempo = tempo;
        t
    }

    fn slugs(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.slug.as_str()).collect()
    }

    #[test]
    fn test_mood_order_calm_to_energetic() {
        let ordered = order_for_flow(vec![
            track("p", Mood::Party, 0),
            track("c", Mood::Chill, 0),
            track("f", Mood::Fusion, 0),
            track("d", Mood::Deep, 0),
        ]);
        assert_eq!(slugs(&ordered), vec!["c", "d", "f", "p"]);
    }

    #[test]
    fn test_tempo_within_mood() {
        let ordered = order_for_flow(vec![
            track("fast", Mood::Chill, 124),
            track("slow", Mood::Chill, 98),
            track("unknown", Mood::Chill, 0), // sorts as 100
        ]);
        assert_eq!(slugs(&ordered), vec!["slow", "unknown", "fast"]);
    }

    #[test]
    fn test_permutation_no_loss() {
        let input = vec![
            track("a", Mood::Party, 120),
            track("b", Mood::Chill, 0),
            track("c", Mood::Deep, 110),
        ];
        let ordered = order_for_flow(input.clone());
        assert_eq!(ordered.len(), input.len());
        for t in &input {
            assert!(ordered.iter().any(|o| o.slug == t.slug));
        }
    }

    #[test]
    fn test_stable_for_ties() {
        let ordered = order_for_flow(vec![
            track("first", Mood::Deep, 112),
            track("second", Mood::Deep, 112),
            track("third", Mood::Deep, 112),
        ]);
        assert_eq!(slugs(&ordered), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        // party(200s), chill(150s), deep(300s) -> chill, deep, party.
        let mut party = track("party", Mood::Party, 0);
        party.duration = 200.0;
        let mut chill = track("chill", Mood::Chill, 0);
        chill.duration = 150.0;
        let mut deep = track("deep", Mood::Deep, 0);
        deep.duration = 300.0;

        let ordered = order_for_flow(vec![party, chill, deep]);
        assert_eq!(slugs(&ordered), vec!["chill", "deep", "party"]);

        let chapters = mixforge_models::Chapter::compute(&ordered);
        assert_eq!(chapters[0].timestamp, "0:00");
        assert_eq!(chapters[1].timestamp, "2:30");
        assert_eq!(chapters[2].timestamp, "7:30");
        let total: f64 = ordered.iter().map(|t| t.duration).sum();
        assert_eq!(mixforge_models::format_timestamp(total), "10:50");
    }
}
