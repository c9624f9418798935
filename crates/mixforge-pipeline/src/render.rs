//! Segment rendering with one fallback retry.

use std::path::Path;

use mixforge_media::{build_fallback_graph, build_segment_graph, render_segment, SegmentSpec};
use mixforge_models::{EncodingConfig, VideoSettings};
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

/// Render a segment; on encode failure retry once with the known-good
/// fallback graph (base transform + plain frequency strip) before giving
/// up on the track.
pub async fn render_with_fallback(
    spec: &SegmentSpec,
    settings: &VideoSettings,
    encoding: &EncodingConfig,
    output: impl AsRef<Path>,
) -> PipelineResult<()> {
    let output = output.as_ref();

    let graph = build_segment_graph(spec, settings)?;
    let outcome = render_segment(spec, &graph, encoding, output).await;
    if outcome.success {
        return Ok(());
    }

    warn!(
        "Render failed with effect '{}', retrying with fallback graph: {}",
        spec.effect,
        stderr_tail(&outcome.stderr)
    );

    let fallback = build_fallback_graph(spec, settings)?;
    let retry = render_segment(spec, &fallback, encoding, output).await;
    if retry.success {
        return Ok(());
    }

    Err(PipelineError::Render(stderr_tail(&retry.stderr).to_string()))
}

/// Last chunk of captured stderr; encoder logs bury the error at the end.
fn stderr_tail(stderr: &str) -> &str {
    let trimmed = stderr.trim_end();
    let start = trimmed.len().saturating_sub(500);
    match trimmed.char_indices().map(|(i, _)| i).find(|i| *i >= start) {
        Some(boundary) => &trimmed[boundary..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_short() {
        assert_eq!(stderr_tail("error: boom\n"), "error: boom");
    }

    #[test]
    fn test_stderr_tail_long() {
        let long = "x".repeat(2000);
        assert_eq!(stderr_tail(&long).len(), 500);
    }
}
