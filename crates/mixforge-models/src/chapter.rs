//! Chapters and compilation info.

use serde::{Deserialize, Serialize};

use crate::timestamp::format_timestamp;
use crate::track::Track;

/// A labeled timestamp marking where one track begins within a compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Start offset in seconds from the beginning of the compilation
    pub start: f64,
    /// Pre-formatted timestamp for descriptions
    pub timestamp: String,
}

impl Chapter {
    /// Compute chapters as a cumulative sum over the ordered track list.
    ///
    /// Every track must have a known duration before entering this
    /// computation; re-run whenever the order changes.
    pub fn compute(tracks: &[Track]) -> Vec<Chapter> {
        let mut chapters = Vec::with_capacity(tracks.len());
        let mut current = 0.0;
        for track in tracks {
            chapters.push(Chapter {
                title: track.title.clone(),
                start: current,
                timestamp: format_timestamp(current),
            });
            current += track.duration;
        }
        chapters
    }

    /// Render chapters as repeated `timestamp - title` lines.
    pub fn text_block(chapters: &[Chapter]) -> String {
        let mut out = String::new();
        for ch in chapters {
            out.push_str(&format!("{} - {}\n", ch.timestamp, ch.title));
        }
        out
    }
}

/// Hand-off artifact describing one compilation run.
///
/// Created once per run and persisted as `compilation_info.json`; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationInfo {
    pub name: String,
    /// Sum of track durations in seconds
    pub total_duration: f64,
    pub track_count: usize,
    /// Tracks in final sequence order, with resolved local paths
    pub tracks: Vec<Track>,
}

impl CompilationInfo {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let total_duration = tracks.iter().map(|t| t.duration).sum();
        Self {
            name: name.into(),
            total_duration,
            track_count: tracks.len(),
            tracks,
        }
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_duration / 60.0
    }
}
