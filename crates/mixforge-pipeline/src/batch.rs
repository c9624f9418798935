//! Batch processing: URLs in, ordered tracks with local assets out.
//!
//! Each URL runs the full acquisition chain sequentially: fetch metadata,
//! classify mood, then (after ordering) download audio and generate both
//! image framings. The result is persisted as `compilation_info.json`,
//! the hand-off artifact for the compilation assembler.

use mixforge_catalog::{download_track_audio, TrackSource};
use mixforge_curate::{classify, order_for_flow, synthesize_prompt};
use mixforge_imagegen::ImageGenClient;
use mixforge_models::settings::{SHORT_HEIGHT, SHORT_WIDTH};
use mixforge_models::{CompilationInfo, Orientation, Track};
use tracing::{info, warn};
use uuid::Uuid;

use crate::compilation::save_compilation_info;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::TrackLogger;

/// Target compilation length used for the duration advisory.
const TARGET_MINUTES: f64 = 60.0;

/// Drives metadata acquisition and asset generation for a track list.
pub struct BatchProcessor {
    config: PipelineConfig,
    source: Box<dyn TrackSource>,
    imagegen: ImageGenClient,
    http: reqwest::Client,
}

impl BatchProcessor {
    pub fn new(config: PipelineConfig, source: Box<dyn TrackSource>, imagegen: ImageGenClient) -> Self {
        Self {
            config,
            source,
            imagegen,
            http: reqwest::Client::new(),
        }
    }

    /// Process a batch of track URLs into an ordered compilation info.
    pub async fn process(&self, urls: &[String], name: &str) -> PipelineResult<CompilationInfo> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Batch processing {} URLs for '{}'", urls.len(), name);

        // Step 1: fetch metadata; failed URLs are logged and dropped.
        let mut tracks: Vec<Track> = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            info!("Fetching [{}/{}]: {}", index + 1, urls.len(), url);
            match self.source.fetch(url).await {
                Ok(record) => {
                    let mut track = record.into_track();
                    track.mood = classify(&track.description);
                    info!(
                        slug = %track.slug,
                        "  {} ({:.1}s, {}, {} bpm)",
                        track.title,
                        track.duration,
                        track.mood,
                        track.tempo
                    );
                    tracks.push(track);
                }
                Err(e) => warn!("  Failed to fetch {}: {}", url, e),
            }
        }
        if tracks.is_empty() {
            return Err(PipelineError::NoTracks);
        }

        // Step 2: duration advisory against the hour target.
        let total_minutes: f64 = tracks.iter().map(|t| t.duration).sum::<f64>() / 60.0;
        if total_minutes < TARGET_MINUTES {
            warn!(
                "Total {:.1} minutes; {:.1} more needed for a {:.0}-minute compilation",
                total_minutes,
                TARGET_MINUTES - total_minutes,
                TARGET_MINUTES
            );
        } else {
            info!("Total {:.1} minutes across {} tracks", total_minutes, tracks.len());
        }

        // Step 3: order for flow before fetching assets so logs read in
        // final sequence order.
        let mut ordered = order_for_flow(tracks);

        let dir = self.config.output_dir.join(name);
        tokio::fs::create_dir_all(&dir).await?;

        // Step 4: audio plus both image framings, sequentially per track.
        for track in &mut ordered {
            let logger = TrackLogger::new(&track.slug, "batch_assets");

            match download_track_audio(&self.http, &track.slug, track.audio_url.as_deref(), &dir)
                .await
            {
                Ok(path) => track.local_audio = Some(path),
                Err(e) => {
                    logger.log_warning(&format!("Audio download failed: {}", e));
                    continue; // no audio, no images needed
                }
            }

            let horizontal = dir.join(format!("{}.png", track.slug));
            let prompt = synthesize_prompt(track, Orientation::Horizontal);
            match self
                .imagegen
                .generate_to_file(
                    &prompt,
                    self.config.settings.width,
                    self.config.settings.height,
                    &horizontal,
                )
                .await
            {
                Ok(path) => track.local_image = Some(path),
                Err(e) => logger.log_warning(&format!("Horizontal image failed: {}", e)),
            }

            let vertical = dir.join(format!("{}_vertical.png", track.slug));
            let prompt = synthesize_prompt(track, Orientation::Vertical);
            match self
                .imagegen
                .generate_to_file(&prompt, SHORT_WIDTH, SHORT_HEIGHT, &vertical)
                .await
            {
                Ok(path) => track.local_image_vertical = Some(path),
                Err(e) => logger.log_warning(&format!("Vertical image failed: {}", e)),
            }
        }

        // Step 5: persist the hand-off artifact.
        let info = CompilationInfo::new(name, ordered);
        save_compilation_info(&info, dir.join("compilation_info.json")).await?;

        info!(
            %run_id,
            "Batch complete: {} tracks, {:.1} minutes",
            info.track_count,
            info.total_minutes()
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mixforge_catalog::{CatalogError, CatalogResult, TrackRecord};

    struct StaticSource;

    #[async_trait]
    impl TrackSource for StaticSource {
        async fn fetch(&self, url: &str) -> CatalogResult<TrackRecord> {
            if url.ends_with("bad") {
                return Err(CatalogError::EmptyMetadata(url.to_string()));
            }
            Ok(TrackRecord {
                title: "Golden Hour".to_string(),
                artist: "Skyline".to_string(),
                duration: 187.4,
                description: "nostalgic sunset groove at 112 bpm".to_string(),
                tags: "amapiano".to_string(),
                tempo: 112,
                audio_url: None, // audio download will fail; tracks still listed
                image_url: None,
                source_id: "id1".to_string(),
                source_url: url.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_urls_dropped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let processor = BatchProcessor::new(
            config,
            Box::new(StaticSource),
            ImageGenClient::new("test").with_base_url("http://127.0.0.1:1"),
        );

        let urls = vec!["https://x/ok".to_string(), "https://x/bad".to_string()];
        let info = processor.process(&urls, "test-mix").await.unwrap();
        assert_eq!(info.track_count, 1);
        assert_eq!(info.tracks[0].slug, "golden_hour");
        // Classifier ran during acquisition.
        assert_eq!(info.tracks[0].mood, mixforge_models::Mood::Chill);
        assert!(dir.path().join("test-mix/compilation_info.json").exists());
    }

    #[tokio::test]
    async fn test_all_urls_failing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let processor = BatchProcessor::new(
            config,
            Box::new(StaticSource),
            ImageGenClient::new("test").with_base_url("http://127.0.0.1:1"),
        );

        let err = processor
            .process(&["https://x/bad".to_string()], "test-mix")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoTracks));
    }
}
