//! Short clip assembly.
//!
//! Cuts a hook window out of a track's audio and renders it against the
//! vertical background image with the portrait composition parameters.

use std::path::Path;

use mixforge_media::SegmentSpec;
use mixforge_models::{Effect, Orientation, Track};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::render::render_with_fallback;

/// Fraction of the track skipped to get past the intro into the groove.
const HOOK_FRACTION: f64 = 0.15;

/// Compute the hook window start for a clip.
///
/// 15% into the track, clamped so the window plus the tail margin fits
/// inside the track. Tracks too short for the window clamp to zero,
/// discarding the skip-the-intro heuristic rather than shrinking the
/// clip.
pub fn hook_start(track_duration: f64, clip_duration: f64, tail_margin: f64) -> f64 {
    let start = track_duration * HOOK_FRACTION;
    let max_start = track_duration - clip_duration - tail_margin;
    if start > max_start {
        max_start.max(0.0)
    } else {
        start
    }
}

/// Drives short-clip rendering for single tracks.
pub struct ShortAssembler<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ShortAssembler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Render a short for `track` into `output`.
    ///
    /// `start` overrides the hook heuristic; `duration` overrides the
    /// configured clip length.
    pub async fn assemble(
        &self,
        track: &Track,
        start: Option<f64>,
        duration: Option<f64>,
        output: impl AsRef<Path>,
    ) -> PipelineResult<()> {
        let output = output.as_ref();

        let audio = track
            .local_audio
            .clone()
            .ok_or_else(|| PipelineError::AssetMissing(track.slug.clone()))?;
        let image = match (&track.local_image_vertical, &track.local_image) {
            (Some(vertical), _) => vertical.clone(),
            (None, Some(horizontal)) => {
                warn!(slug = %track.slug, "No vertical image; cropping the horizontal one");
                horizontal.clone()
            }
            (None, None) => return Err(PipelineError::AssetMissing(track.slug.clone())),
        };

        let clip_duration = duration.unwrap_or(self.config.short.duration);
        let clip_start = start.unwrap_or_else(|| {
            hook_start(track.duration, clip_duration, self.config.short.tail_margin)
        });

        info!(
            slug = %track.slug,
            "Rendering short: start {:.1}s, duration {:.1}s",
            clip_start,
            clip_duration
        );

        let spec = SegmentSpec::new(audio, image, clip_duration)
            .with_title(track.title.clone())
            .with_mask(track.mask.clone())
            .with_effect(Effect::GlowBars)
            .with_orientation(Orientation::Vertical)
            .with_audio_start(clip_start);

        render_with_fallback(&spec, &self.config.settings, &self.config.encoding, output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_start_long_track() {
        // 300s track: 15% in, well within bounds.
        assert!((hook_start(300.0, 45.0, 5.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_hook_start_clamps_to_fit_window() {
        // 200s track: 15% = 30s, max start = 150s; unclamped.
        assert!((hook_start(200.0, 45.0, 5.0) - 30.0).abs() < 1e-9);
        // 60s track: 15% = 9s, but max start = 10s; still fits.
        assert!((hook_start(60.0, 45.0, 5.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_hook_start_short_track_clamps_to_zero() {
        // 40s track with a 45s clip: max start is negative, clamp to 0.
        let start = hook_start(40.0, 45.0, 5.0);
        assert_eq!(start, 0.0);
        assert!(start >= 0.0);
    }

    #[test]
    fn test_hook_window_never_negative() {
        for duration in [1.0, 20.0, 44.0, 49.9, 50.0] {
            assert!(hook_start(duration, 45.0, 5.0) >= 0.0);
        }
    }
}
