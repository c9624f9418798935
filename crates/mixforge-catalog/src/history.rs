//! Run history persistence.
//!
//! One JSON document records uploaded videos, processed tracks, pending
//! manual tasks and counters. Load-or-default on read; pretty-printed on
//! save so the file stays hand-editable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CatalogResult;

/// Default history file name.
pub const HISTORY_FILE: &str = "channel_history.json";

/// Kind of published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    Full,
    Short,
    Compilation,
}

/// One published video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub kind: VideoKind,
    pub uploaded_at: DateTime<Utc>,
}

/// One processed track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub full_video_id: Option<String>,
    #[serde(default)]
    pub short_video_id: Option<String>,
}

/// A manual step still owed in the hosting platform's UI, e.g. linking a
/// short to its full track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTask {
    pub short_id: String,
    pub short_title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStats {
    #[serde(default)]
    pub total_uploads: u32,
    #[serde(default)]
    pub total_minutes: f64,
}

/// The persisted channel history document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelHistory {
    #[serde(default)]
    pub videos: Vec<UploadedVideo>,
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
    #[serde(default)]
    pub pending_tasks: Vec<PendingTask>,
    #[serde(default)]
    pub stats: HistoryStats,
}

impl ChannelHistory {
    /// Load history from disk, defaulting to an empty document when the
    /// file does not exist yet.
    pub async fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist history, pretty-printed.
    pub async fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }

    /// Record one published video and bump the counters.
    pub fn record_upload(&mut self, video: UploadedVideo, duration_secs: f64) {
        if video.kind == VideoKind::Short {
            self.pending_tasks.push(PendingTask {
                short_id: video.video_id.clone(),
                short_title: video.title.clone(),
                done: false,
            });
        }
        self.stats.total_uploads += 1;
        self.stats.total_minutes += duration_secs / 60.0;
        self.videos.push(video);
    }

    /// Mark a short's related-video task done.
    pub fn mark_related_done(&mut self, short_id: &str) -> bool {
        let mut found = false;
        for task in &mut self.pending_tasks {
            if task.short_id == short_id {
                task.done = true;
                found = true;
            }
        }
        found
    }

    /// Tasks still outstanding.
    pub fn open_tasks(&self) -> impl Iterator<Item = &PendingTask> {
        self.pending_tasks.iter().filter(|t| !t.done)
    }
}
