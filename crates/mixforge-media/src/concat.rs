//! Segment and audio concatenation.

use std::path::{Path, PathBuf};

use mixforge_models::EncodingConfig;
use tokio::fs;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_duration;

/// One line of an FFmpeg concat demuxer list file.
///
/// Single quotes inside the path are closed, escaped and reopened, the
/// quoting form the demuxer requires.
fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', "'\\''");
    format!("file '{}'\n", escaped)
}

/// Concatenate rendered segments, in order, into one output file.
///
/// Segments are already encoded with identical parameters, so the demuxer
/// boundary is lossless in structure; the pass still re-encodes with the
/// final quality settings to guarantee uniform output.
pub async fn concat_segments(
    segments: &[PathBuf],
    encoding: &EncodingConfig,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let output = output.as_ref();
    if segments.is_empty() {
        return Err(MediaError::concat_failed("no segments to concatenate", None));
    }

    let dir = tempfile::tempdir()?;
    let list_path = dir.path().join("concat_list.txt");
    let mut list = String::new();
    for segment in segments {
        list.push_str(&concat_list_entry(segment));
    }
    fs::write(&list_path, list).await?;

    let cmd = FfmpegCommand::new(output)
        .input_with_args(&list_path, ["-f", "concat", "-safe", "0"])
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .pix_fmt(&encoding.pix_fmt);

    info!(
        "Concatenating {} segments -> {}",
        segments.len(),
        output.display()
    );

    FfmpegRunner::new().run(&cmd).await.map_err(|e| match e {
        MediaError::FfmpegFailed { stderr, .. } => {
            MediaError::concat_failed("segment concatenation failed", stderr)
        }
        other => other,
    })
}

/// Concatenate raw per-track audio streams and return the combined
/// duration. Used as a sanity check against the expected sum, not for
/// final video timing.
pub async fn concat_audio(files: &[PathBuf], output: impl AsRef<Path>) -> MediaResult<f64> {
    let output = output.as_ref();
    if files.is_empty() {
        return Err(MediaError::concat_failed("no audio files to concatenate", None));
    }

    if files.len() == 1 {
        fs::copy(&files[0], output).await?;
        return probe_duration(output).await;
    }

    let mut cmd = FfmpegCommand::new(output);
    for file in files {
        cmd = cmd.input(file);
    }

    let labels: String = (0..files.len()).map(|i| format!("[{}:a]", i)).collect();
    let filter = format!("{}concat=n={}:v=0:a=1[outa]", labels, files.len());

    let cmd = cmd
        .filter_complex(filter)
        .map("outa")
        .audio_codec("libmp3lame")
        .output_args(["-q:a", "2"]);

    FfmpegRunner::new().run(&cmd).await.map_err(|e| match e {
        MediaError::FfmpegFailed { stderr, .. } => {
            MediaError::concat_failed("audio concatenation failed", stderr)
        }
        other => other,
    })?;

    probe_duration(output).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_list_entry_plain() {
        assert_eq!(
            concat_list_entry(Path::new("/tmp/segment_000.mp4")),
            "file '/tmp/segment_000.mp4'\n"
        );
    }

    #[test]
    fn test_concat_list_entry_quoted() {
        assert_eq!(
            concat_list_entry(Path::new("/tmp/it's here.mp4")),
            "file '/tmp/it'\\''s here.mp4'\n"
        );
    }

    #[tokio::test]
    async fn test_empty_segments_rejected() {
        let err = concat_segments(&[], &EncodingConfig::default(), "/tmp/out.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::ConcatFailed { .. }));
    }
}
