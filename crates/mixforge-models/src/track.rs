//! Track model: one externally sourced audio track and its acquired assets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::mood::Mood;

/// One track flowing through the pipeline.
///
/// Created by metadata acquisition; the classifier sets `mood`, asset fetch
/// stages set the `local_*` paths. Treated as immutable once it enters the
/// compilation assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Filesystem-safe identifier derived from the title
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Free-text description from the source; drives mood and prompts
    #[serde(default)]
    pub description: String,
    /// Duration in seconds; must be > 0 before chapter computation
    pub duration: f64,
    /// Detected mood
    #[serde(default)]
    pub mood: Mood,
    /// Tempo estimate in BPM; 0 = unknown
    #[serde(default)]
    pub tempo: u32,
    #[serde(default)]
    pub tags: String,
    /// Content identifier at the source
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Downloaded audio asset
    #[serde(default)]
    pub local_audio: Option<PathBuf>,
    /// Generated 16:9 background image
    #[serde(default)]
    pub local_image: Option<PathBuf>,
    /// Generated 9:16 background image for shorts
    #[serde(default)]
    pub local_image_vertical: Option<PathBuf>,
    /// Optional segmentation mask (white = effect region)
    #[serde(default)]
    pub mask: Option<PathBuf>,
}

impl Track {
    /// Minimal constructor used by tests and single-track commands.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, duration: f64) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            artist: String::new(),
            description: String::new(),
            duration,
            mood: Mood::default(),
            tempo: 0,
            tags: String::new(),
            source_id: String::new(),
            source_url: String::new(),
            audio_url: None,
            image_url: None,
            local_audio: None,
            local_image: None,
            local_image_vertical: None,
            mask: None,
        }
    }

    /// Whether the track has the local assets required for rendering.
    pub fn has_render_assets(&self) -> bool {
        self.local_audio.is_some() && self.local_image.is_some()
    }

    /// Effective tempo for sequencing: unknown (0) sorts as 100.
    pub fn effective_tempo(&self) -> u32 {
        if self.tempo == 0 {
            100
        } else {
            self.tempo
        }
    }
}
