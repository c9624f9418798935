//! End-to-end render tests against the real FFmpeg binary.
//!
//! Ignored by default; run them on a machine with ffmpeg/ffprobe:
//!   cargo test -p mixforge-media -- --ignored

use std::path::{Path, PathBuf};

use mixforge_media::{
    build_fallback_graph, build_segment_graph, concat_segments, probe_duration, render_segment,
    SegmentSpec,
};
use mixforge_models::{Effect, EncodingConfig, VideoSettings};

/// Synthesize a short tone and a solid background image with ffmpeg.
async fn make_assets(dir: &Path) -> (PathBuf, PathBuf) {
    let audio = dir.join("tone.wav");
    let image = dir.join("bg.png");

    let status = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
        .arg("sine=frequency=440:duration=3")
        .arg(&audio)
        .status()
        .await
        .expect("spawn ffmpeg");
    assert!(status.success(), "tone synthesis failed");

    let status = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
        .arg("color=c=teal:s=640x360")
        .args(["-frames:v", "1"])
        .arg(&image)
        .status()
        .await
        .expect("spawn ffmpeg");
    assert!(status.success(), "background synthesis failed");

    (audio, image)
}

/// Small frame so the ignored tests stay fast.
fn test_settings() -> VideoSettings {
    VideoSettings {
        width: 320,
        height: 180,
        ..VideoSettings::default()
    }
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_static_segment_renders() {
    let dir = tempfile::tempdir().unwrap();
    let (audio, image) = make_assets(dir.path()).await;

    let spec = SegmentSpec::new(audio, image, 3.0).with_effect(Effect::Static);
    let graph = build_segment_graph(&spec, &test_settings()).unwrap();

    let output = dir.path().join("static.mp4");
    let outcome = render_segment(&spec, &graph, &EncodingConfig::default(), &output).await;
    assert!(outcome.success, "render failed: {}", outcome.stderr);

    let duration = probe_duration(&output).await.unwrap();
    assert!((duration - 3.0).abs() < 0.5, "unexpected duration {}", duration);
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_glow_bars_segment_renders() {
    let dir = tempfile::tempdir().unwrap();
    let (audio, image) = make_assets(dir.path()).await;

    let spec = SegmentSpec::new(audio, image, 3.0)
        .with_title("Smoke Test")
        .with_effect(Effect::GlowBars);
    let settings = test_settings();
    let graph = build_segment_graph(&spec, &settings).unwrap();

    let output = dir.path().join("glow_bars.mp4");
    let outcome = render_segment(&spec, &graph, &EncodingConfig::default(), &output).await;

    // Environments without a usable fontconfig fail the drawtext stage;
    // the fallback graph must still render, mirroring the pipeline's
    // retry policy.
    if !outcome.success {
        let fallback = build_fallback_graph(&spec, &settings).unwrap();
        let retry = render_segment(&spec, &fallback, &EncodingConfig::default(), &output).await;
        assert!(retry.success, "fallback render failed: {}", retry.stderr);
    }

    let duration = probe_duration(&output).await.unwrap();
    assert!((duration - 3.0).abs() < 0.5, "unexpected duration {}", duration);
}

#[tokio::test]
#[ignore = "requires ffmpeg"]
async fn test_segments_concatenate() {
    let dir = tempfile::tempdir().unwrap();
    let (audio, image) = make_assets(dir.path()).await;

    let encoding = EncodingConfig::default();
    let settings = test_settings();
    let mut segments = Vec::new();
    for index in 0..2 {
        // Seeked audio bounds the segment at the clip duration.
        let spec = SegmentSpec::new(&audio, &image, 2.0)
            .with_effect(Effect::Static)
            .with_audio_start(0.5);
        let graph = build_segment_graph(&spec, &settings).unwrap();
        let path = dir.path().join(format!("segment_{:03}.mp4", index));
        let outcome = render_segment(&spec, &graph, &encoding, &path).await;
        assert!(outcome.success, "segment render failed: {}", outcome.stderr);
        segments.push(path);
    }

    let output = dir.path().join("stitched.mp4");
    concat_segments(&segments, &encoding, &output).await.unwrap();

    let duration = probe_duration(&output).await.unwrap();
    assert!((duration - 4.0).abs() < 0.8, "unexpected duration {}", duration);
}
