//! Long-form compilation assembly.
//!
//! Validates tracks, orders them for flow, renders one segment per track
//! (with a fallback retry), computes chapters from the surviving order
//! and stitches everything into a single timed video. Per-track failures
//! skip the track; the run only fails when nothing renders or the final
//! concatenation breaks.

use std::path::{Path, PathBuf};

use mixforge_curate::order_for_flow;
use mixforge_media::{concat_audio, concat_segments, SegmentSpec};
use mixforge_models::{Chapter, CompilationInfo, Effect, Track};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::TrackLogger;
use crate::render::render_with_fallback;

/// Tolerance for the combined-audio duration sanity check, in seconds.
const AUDIO_DURATION_TOLERANCE: f64 = 1.0;

/// Result of one compilation run.
#[derive(Debug)]
pub struct CompilationOutcome {
    pub info: CompilationInfo,
    pub chapters: Vec<Chapter>,
    /// Repeated `timestamp - title` lines for the upload description
    pub chapter_text: String,
    pub video_path: PathBuf,
    /// Tracks that made it into the final video
    pub rendered: usize,
    /// Tracks skipped for missing assets or render failures
    pub skipped: usize,
}

/// Drives the full compilation flow for one named run.
pub struct CompilationAssembler<'a> {
    config: &'a PipelineConfig,
}

impl<'a> CompilationAssembler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Assemble a compilation from `tracks` into `output`.
    ///
    /// Segment files are written under the compilation's work directory
    /// (`<output_dir>/<name>`). Concurrent runs against the same name are
    /// not supported.
    pub async fn assemble(
        &self,
        name: &str,
        tracks: Vec<Track>,
        effect: Effect,
        output: impl AsRef<Path>,
    ) -> PipelineResult<CompilationOutcome> {
        let output = output.as_ref();
        let work_dir = self.config.output_dir.join(name);
        tokio::fs::create_dir_all(&work_dir).await?;

        // Step 1: drop tracks that cannot render; not fatal to the run.
        let mut valid = Vec::new();
        let mut skipped = 0usize;
        for track in tracks {
            if !track.has_render_assets() {
                warn!(slug = %track.slug, "Skipping track: missing audio or image asset");
                skipped += 1;
                continue;
            }
            if track.duration <= 0.0 {
                warn!(slug = %track.slug, "Skipping track: unknown duration");
                skipped += 1;
                continue;
            }
            valid.push(track);
        }
        if valid.is_empty() {
            return Err(PipelineError::NoTracks);
        }

        // Step 2: order for listening flow. Segment order and chapter
        // offsets both derive from this one ordering.
        let ordered = order_for_flow(valid);
        info!("Compilation '{}': {} tracks after validation", name, ordered.len());

        // Step 3: render one segment per track, sequentially. Segments
        // share one encoding (faster preset) so the concat boundary never
        // has to reconcile mismatched codecs.
        let segment_encoding = self.config.encoding.for_segments();
        let mut rendered_tracks: Vec<Track> = Vec::new();
        let mut segments: Vec<PathBuf> = Vec::new();
        for (index, track) in ordered.into_iter().enumerate() {
            let logger = TrackLogger::new(&track.slug, "segment_render");
            let segment_path = work_dir.join(format!("segment_{:03}.mp4", index));

            let (audio, image) = match (track.local_audio.clone(), track.local_image.clone()) {
                (Some(audio), Some(image)) => (audio, image),
                _ => continue, // excluded by validation
            };
            let spec = SegmentSpec::new(audio, image, track.duration)
                .with_title(track.title.clone())
                .with_mask(track.mask.clone())
                .with_effect(effect);

            logger.log_start(&format!("Rendering segment {}", segment_path.display()));
            match render_with_fallback(&spec, &self.config.settings, &segment_encoding, &segment_path)
                .await
            {
                Ok(()) => {
                    logger.log_progress("Segment rendered");
                    segments.push(segment_path);
                    rendered_tracks.push(track);
                }
                Err(e) => {
                    logger.log_error(&format!("Track excluded from compilation: {}", e));
                    skipped += 1;
                }
            }
        }
        if segments.is_empty() {
            return Err(PipelineError::NoSegments);
        }

        // Step 4: chapters over the tracks that actually rendered, in the
        // same order their segments will be stitched.
        let chapters = Chapter::compute(&rendered_tracks);
        for chapter in &chapters {
            info!("  {} - {}", chapter.timestamp, chapter.title);
        }

        // Step 5: stitch segments. Failure here is fatal: a partial
        // compilation artifact is meaningless.
        concat_segments(&segments, &self.config.encoding, output).await?;

        // Step 6: combined-audio duration sanity check.
        let audio_files: Vec<PathBuf> = rendered_tracks
            .iter()
            .filter_map(|t| t.local_audio.clone())
            .collect();
        let expected: f64 = rendered_tracks.iter().map(|t| t.duration).sum();
        match concat_audio(&audio_files, work_dir.join("concat_audio.mp3")).await {
            Ok(combined) => {
                if (combined - expected).abs() > AUDIO_DURATION_TOLERANCE {
                    warn!(
                        "Combined audio duration {:.2}s differs from expected {:.2}s",
                        combined, expected
                    );
                }
            }
            Err(e) => warn!("Audio duration check skipped: {}", e),
        }

        let rendered = rendered_tracks.len();
        let info = CompilationInfo::new(name, rendered_tracks);
        let chapter_text = Chapter::text_block(&chapters);

        info!(
            "Compilation '{}' complete: {} tracks, {:.1} minutes, {} skipped",
            name,
            rendered,
            info.total_minutes(),
            skipped
        );

        Ok(CompilationOutcome {
            info,
            chapters,
            chapter_text,
            video_path: output.to_path_buf(),
            rendered,
            skipped,
        })
    }
}

/// Load a persisted compilation-info document.
pub async fn load_compilation_info(path: impl AsRef<Path>) -> PipelineResult<CompilationInfo> {
    let raw = tokio::fs::read_to_string(path.as_ref()).await?;
    let info: CompilationInfo = serde_json::from_str(&raw)?;
    if info.tracks.is_empty() {
        return Err(PipelineError::InvalidInfo("empty track list".to_string()));
    }
    Ok(info)
}

/// Persist a compilation-info document, pretty-printed.
pub async fn save_compilation_info(
    info: &CompilationInfo,
    path: impl AsRef<Path>,
) -> PipelineResult<()> {
    let raw = serde_json::to_string_pretty(info)?;
    tokio::fs::write(path.as_ref(), raw).await?;
    Ok(())
}
