//! Video output settings.

use serde::{Deserialize, Serialize};

use crate::effect::Orientation;

/// Default landscape resolution.
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
/// Portrait resolution for shorts.
pub const SHORT_WIDTH: u32 = 1080;
pub const SHORT_HEIGHT: u32 = 1920;
/// Default frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Output resolution, frame rate and channel branding, threaded explicitly
/// through every composition component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Channel display name, drawn on overlays
    pub channel_name: String,
    /// Channel handle including the `@`
    pub channel_handle: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            channel_name: "MixForge".to_string(),
            channel_handle: "@mixforge".to_string(),
        }
    }
}

impl VideoSettings {
    /// The same settings reframed for the given orientation.
    pub fn for_orientation(&self, orientation: Orientation) -> VideoSettings {
        match orientation {
            Orientation::Horizontal => self.clone(),
            Orientation::Vertical => VideoSettings {
                width: SHORT_WIDTH,
                height: SHORT_HEIGHT,
                ..self.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_reframe() {
        let settings = VideoSettings::default();
        let vertical = settings.for_orientation(Orientation::Vertical);
        assert_eq!(vertical.width, 1080);
        assert_eq!(vertical.height, 1920);
        assert_eq!(vertical.fps, settings.fps);
        assert_eq!(vertical.channel_name, settings.channel_name);
    }
}
