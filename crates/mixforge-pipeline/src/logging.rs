//! Structured per-track logging.
//!
//! Consistent formatting for track lifecycle events with the slug and
//! pipeline stage attached to every line.

use tracing::{error, info, warn, Span};

/// Track logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct TrackLogger {
    slug: String,
    stage: String,
}

impl TrackLogger {
    /// Create a logger for one track and pipeline stage
    /// (e.g. "segment_render", "batch_fetch").
    pub fn new(slug: &str, stage: &str) -> Self {
        Self {
            slug: slug.to_string(),
            stage: stage.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(slug = %self.slug, stage = %self.stage, "{}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(slug = %self.slug, stage = %self.stage, "{}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(slug = %self.slug, stage = %self.stage, "{}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(slug = %self.slug, stage = %self.stage, "{}", message);
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Create a tracing span carrying the track context.
    pub fn span(&self) -> Span {
        tracing::info_span!("track", slug = %self.slug, stage = %self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_fields() {
        let logger = TrackLogger::new("sunset_drive", "segment_render");
        assert_eq!(logger.slug(), "sunset_drive");
    }
}
