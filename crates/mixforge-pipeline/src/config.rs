//! Pipeline configuration.

use std::path::PathBuf;

use mixforge_models::{EncodingConfig, VideoSettings};

/// Short-clip settings.
#[derive(Debug, Clone)]
pub struct ShortConfig {
    /// Clip length in seconds
    pub duration: f64,
    /// Seconds of audio that must remain after the clip window
    pub tail_margin: f64,
}

impl Default for ShortConfig {
    fn default() -> Self {
        Self {
            duration: 45.0,
            tail_margin: 5.0,
        }
    }
}

/// Configuration threaded from the composition root through every
/// component.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding per-compilation work directories
    pub output_dir: PathBuf,
    /// Channel history document path
    pub history_path: PathBuf,
    pub settings: VideoSettings,
    pub encoding: EncodingConfig,
    pub short: ShortConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("compilations"),
            history_path: PathBuf::from("channel_history.json"),
            settings: VideoSettings::default(),
            encoding: EncodingConfig::default(),
            short: ShortConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables, with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut settings = VideoSettings::default();
        if let Ok(name) = std::env::var("MIXFORGE_CHANNEL_NAME") {
            settings.channel_name = name;
        }
        if let Ok(handle) = std::env::var("MIXFORGE_CHANNEL_HANDLE") {
            settings.channel_handle = handle;
        }
        if let Some(fps) = env_parse("MIXFORGE_FPS") {
            settings.fps = fps;
        }

        let mut encoding = EncodingConfig::default();
        if let Some(crf) = env_parse("MIXFORGE_CRF") {
            encoding.crf = crf;
        }
        if let Ok(preset) = std::env::var("MIXFORGE_PRESET") {
            encoding.preset = preset;
        }

        Self {
            output_dir: std::env::var("MIXFORGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            history_path: std::env::var("MIXFORGE_HISTORY")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_path),
            settings,
            encoding,
            short: ShortConfig {
                duration: env_parse("MIXFORGE_SHORT_DURATION").unwrap_or(defaults.short.duration),
                tail_margin: defaults.short.tail_margin,
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("compilations"));
        assert_eq!(config.short.duration, 45.0);
        assert_eq!(config.settings.fps, 30);
    }
}
