//! Visual prompt synthesis for image generation.
//!
//! Deterministic string assembly: a mood-indexed base scene, plus a
//! fragment for each thematic trigger found in the track description (in
//! trigger-list order, duplicates suppressed), plus per-orientation
//! quality qualifiers. No external calls happen here; the resulting
//! prompt is handed to the image-generation collaborator.

use mixforge_models::{Mood, Orientation, Track};

/// One thematic trigger: any keyword hit appends the orientation's
/// fragment.
struct Trigger {
    keywords: &'static [&'static str],
    horizontal: &'static str,
    vertical: &'static str,
}

const TRIGGERS: &[Trigger] = &[
    Trigger {
        keywords: &["playground", "children"],
        horizontal: "children playing in distance",
        vertical: "children playing joyfully in golden sunlight",
    },
    Trigger {
        keywords: &["sunset", "golden"],
        horizontal: "golden hour sunset",
        vertical: "breathtaking golden hour sunset with volumetric rays",
    },
    Trigger {
        keywords: &["township", "south africa"],
        horizontal: "South African township",
        vertical: "vibrant South African township with colorful houses",
    },
    Trigger {
        keywords: &["night", "club"],
        horizontal: "nighttime city lights",
        vertical: "electric nightlife with neon reflections",
    },
    Trigger {
        keywords: &["nature", "savanna"],
        horizontal: "African savanna landscape",
        vertical: "majestic African savanna with acacia silhouettes",
    },
    Trigger {
        keywords: &["nostalgic", "memories"],
        horizontal: "dreamy nostalgic atmosphere",
        vertical: "dreamy nostalgic atmosphere with warm film grain",
    },
    Trigger {
        keywords: &["piano"],
        horizontal: "piano keys with dramatic lighting",
        vertical: "elegant piano keys with dramatic lighting",
    },
];

fn base_scene(mood: Mood, orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => match mood {
            Mood::Chill => "Nostalgic warm scene, soft golden light, peaceful atmosphere",
            Mood::Party => "Vibrant nightlife scene, neon colors, energetic crowd silhouettes",
            Mood::Deep => "Moody atmospheric scene, purple and blue tones, introspective vibe",
            Mood::Fusion => "African cultural fusion, traditional patterns, modern aesthetic",
        },
        Orientation::Vertical => match mood {
            Mood::Chill => "peaceful golden hour scene, warm amber tones, soft dreamy atmosphere",
            Mood::Party => "electric nightlife energy, neon lights, dancing silhouettes, vibrant colors",
            Mood::Deep => "moody atmospheric scene, deep purple and blue tones, introspective lighting",
            Mood::Fusion => "rich African cultural tapestry, traditional meets modern, bold patterns",
        },
    }
}

fn quality_suffix(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => "amapiano music visualizer style, cinematic, 4K",
        Orientation::Vertical => {
            "dramatic vertical composition with strong focal point, \
             cinematic lighting with volumetric god rays, \
             hyper-detailed 8K quality, vibrant saturated colors, \
             shallow depth of field with beautiful bokeh, \
             professional music video aesthetic, \
             vertical portrait orientation 9:16 aspect ratio, \
             masterpiece quality, photorealistic"
        }
    }
}

/// Build the image prompt for a track and framing.
pub fn synthesize_prompt(track: &Track, orientation: Orientation) -> String {
    let lower = track.description.to_lowercase();

    let mut parts = vec![base_scene(track.mood, orientation).to_string()];

    for trigger in TRIGGERS {
        if trigger.keywords.iter().any(|k| lower.contains(k)) {
            let fragment = match orientation {
                Orientation::Horizontal => trigger.horizontal,
                Orientation::Vertical => trigger.vertical,
            };
            let fragment = fragment.to_string();
            if !parts.contains(&fragment) {
                parts.push(fragment);
            }
        }
    }

    parts.push(quality_suffix(orientation).to_string());
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(mood: Mood, description: &str) -> Track {
        let mut t = Track::new("t", "T", 180.0);
        t.mood = mood;
        t.description = description.to_string();
        t
    }

    #[test]
    fn test_base_scene_only() {
        let prompt = synthesize_prompt(&track(Mood::Deep, "nothing thematic"), Orientation::Horizontal);
        assert!(prompt.starts_with("Moody atmospheric scene"));
        assert!(prompt.ends_with("cinematic, 4K"));
    }

    #[test]
    fn test_triggers_append_in_order() {
        let prompt = synthesize_prompt(
            &track(Mood::Chill, "piano over a golden sunset"),
            Orientation::Horizontal,
        );
        let sunset = prompt.find("golden hour sunset").unwrap();
        let piano = prompt.find("piano keys with dramatic lighting").unwrap();
        // sunset trigger is declared before piano
        assert!(sunset < piano);
    }

    #[test]
    fn test_duplicate_fragments_suppressed() {
        // "sunset" and "golden" both hit the same trigger.
        let prompt = synthesize_prompt(
            &track(Mood::Chill, "golden sunset vibes"),
            Orientation::Horizontal,
        );
        assert_eq!(prompt.matches("golden hour sunset").count(), 1);
    }

    #[test]
    fn test_vertical_adds_aspect_qualifiers() {
        let t = track(Mood::Party, "club night");
        let vertical = synthesize_prompt(&t, Orientation::Vertical);
        let horizontal = synthesize_prompt(&t, Orientation::Horizontal);
        assert!(vertical.contains("9:16 aspect ratio"));
        assert!(!horizontal.contains("9:16"));
    }

    #[test]
    fn test_deterministic() {
        let t = track(Mood::Fusion, "traditional goje with township nights");
        assert_eq!(
            synthesize_prompt(&t, Orientation::Vertical),
            synthesize_prompt(&t, Orientation::Vertical)
        );
    }
}
