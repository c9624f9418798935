//! Upload description generation.

use mixforge_models::timestamp::format_minutes;
use mixforge_models::{Chapter, CompilationInfo, Mood, Track, VideoSettings};

/// Emoji badge per mood for description headers.
pub fn mood_emoji(mood: Mood) -> &'static str {
    match mood {
        Mood::Chill => "\u{2615}",       // hot beverage
        Mood::Party => "\u{1F525}",      // fire
        Mood::Deep => "\u{1F4AB}",       // dizzy
        Mood::Fusion => "\u{1F30D}",     // globe
    }
}

/// Most common mood across a track list; ties resolve in declaration
/// order.
pub fn primary_mood(tracks: &[Track]) -> Mood {
    let mut best = Mood::Chill;
    let mut best_count = 0usize;
    for mood in Mood::ALL {
        let count = tracks.iter().filter(|t| t.mood == *mood).count();
        if count > best_count {
            best = *mood;
            best_count = count;
        }
    }
    best
}

/// Build the upload description for a compilation, chapters included.
pub fn compilation_description(
    info: &CompilationInfo,
    chapters: &[Chapter],
    settings: &VideoSettings,
) -> String {
    let emoji = mood_emoji(primary_mood(&info.tracks));

    let mut description = format!(
        "{} {} | Amapiano Mix\n\n\
         {:.0} minutes of smooth amapiano vibes. Perfect for studying, working, or just vibing.\n\n\
         CHAPTERS (click to jump):\n\n",
        emoji,
        info.name,
        info.total_minutes()
    );

    description.push_str(&Chapter::text_block(chapters));

    description.push_str(&format!(
        "\nSubscribe to {} for more Amapiano\n\n\
         Playlists:\n\
         - Chill - Study & Relax\n\
         - Party - High Energy\n\
         - Deep - Soulful Vibes\n\n\
         #amapiano #amapianomix #studymusic #chillbeats #southafrica\n",
        settings.channel_handle
    ));

    description
}

/// Build the upload description for a single full-track video.
pub fn track_description(track: &Track, settings: &VideoSettings) -> String {
    format!(
        "{} {}\n\
         {} - Your daily dose of South African house music\n\n\
         Genre: Amapiano\n\
         Duration: {}\n\
         Style: {}\n\n\
         Subscribe to {} for more Amapiano\n\n\
         Playlists:\n\
         - Chill - Study & Relax\n\
         - Party - High Energy\n\
         - Deep - Soulful Vibes\n\n\
         #amapiano #southafrica #pianomusic #amapianovibes\n",
        mood_emoji(track.mood),
        track.title,
        settings.channel_name,
        format_minutes(track.duration),
        track.mood,
        settings.channel_handle
    )
}

/// Default upload tags for compilations.
pub fn default_tags() -> Vec<String> {
    [
        "amapiano",
        "amapiano mix",
        "south african house",
        "piano music",
        "study music",
        "deep house",
        "african music",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
