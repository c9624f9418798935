//! Segment rendering: one FFmpeg invocation per composed filter graph.

use std::path::Path;

use mixforge_models::EncodingConfig;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::graph::FilterGraph;
use crate::visualizer::SegmentSpec;

/// Result of one render attempt.
///
/// Rendering never raises: all failure is reported through `success` plus
/// the captured diagnostic text. On failure any file at the output path is
/// untrusted; the renderer does not clean it up.
#[derive(Debug)]
pub struct RenderOutcome {
    pub success: bool,
    pub stderr: String,
}

impl RenderOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: message.into(),
        }
    }
}

/// Render one segment from a spec and its composed graph.
///
/// Inputs are added in the graph's label order: `0:v` looped image,
/// `1:a` audio (seeked for hook windows), `2:v` looped mask when the
/// graph consumes it.
pub async fn render_segment(
    spec: &SegmentSpec,
    graph: &FilterGraph,
    encoding: &EncodingConfig,
    output: impl AsRef<Path>,
) -> RenderOutcome {
    let output = output.as_ref();

    let mut cmd = FfmpegCommand::new(output).looped_image(&spec.image);

    cmd = if spec.audio_start > 0.0 {
        cmd.seeked_input(&spec.audio, spec.audio_start, spec.duration)
    } else {
        cmd.input(&spec.audio)
    };

    if graph.uses_mask_input() {
        match &spec.mask {
            Some(mask) => cmd = cmd.looped_image(mask),
            None => {
                return RenderOutcome::failure("graph consumes a mask but none was supplied");
            }
        }
    }

    cmd = cmd
        .filter_complex(graph.render())
        .map(graph.video_out())
        .map(graph.audio_out())
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .shortest()
        // The looped image stream is unbounded and effects without
        // zoompan have no frame count, so the output must also be capped
        // at the clip duration explicitly.
        .duration_limit(spec.duration)
        .pix_fmt(&encoding.pix_fmt)
        .output_args(encoding.extra_args.clone());

    info!(
        "Rendering segment: {} ({} stages, {:.1}s)",
        output.display(),
        graph.stages().len(),
        spec.duration
    );
    debug!("filter_complex: {}", graph.render());

    match FfmpegRunner::new().run_capture(&cmd).await {
        Ok(result) => RenderOutcome {
            success: result.success,
            stderr: result.stderr,
        },
        Err(e) => RenderOutcome::failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::build_segment_graph;
    use mixforge_models::{Effect, VideoSettings};

    #[tokio::test]
    async fn test_mask_required_by_graph_but_missing() {
        // Force a mask-consuming graph, then drop the mask from the spec.
        let spec = SegmentSpec::new("a.mp3", "i.png", 30.0)
            .with_effect(Effect::GlowBars)
            .with_mask(Some("m.png".into()));
        let graph = build_segment_graph(&spec, &VideoSettings::default()).unwrap();
        let broken = spec.with_mask(None);

        let outcome =
            render_segment(&broken, &graph, &EncodingConfig::default(), "/tmp/out.mp4").await;
        assert!(!outcome.success);
        assert!(outcome.stderr.contains("mask"));
    }
}
