//! Visual effect and orientation definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Available visual effects for a rendered segment.
///
/// Each variant selects a filter-graph shape in the composition engine.
/// `GlowBars` is the richest path and the default for compilations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Slow Ken Burns zoom on the background image
    Zoom,
    /// Hue cycling over time
    Pulse,
    /// Line waveform strip at the bottom
    Waves,
    /// Constant-Q spectrum strip (piano-roll style)
    Spectrum,
    /// Blurred frequency bars floating at the bottom center
    GlowSpectrum,
    /// Translucent frequency bars along the bottom edge
    BarsBottom,
    /// Mirrored waveforms top and bottom
    DualWaves,
    /// Frequency bars with glow and reflection
    NeonBars,
    /// Film grain, vignette and warm color cast
    Vintage,
    /// Periodic color/brightness pulse inside a segmentation mask
    MaskedGlow,
    /// Mask-split foreground/background with dual-rate zoom
    Parallax,
    /// Zoom + frequency bars + glow + alpha fade; the full compilation look
    #[default]
    GlowBars,
    /// Still image with audio; the always-available fallback
    Static,
}

impl Effect {
    pub const ALL: &'static [Effect] = &[
        Effect::Zoom,
        Effect::Pulse,
        Effect::Waves,
        Effect::Spectrum,
        Effect::GlowSpectrum,
        Effect::BarsBottom,
        Effect::DualWaves,
        Effect::NeonBars,
        Effect::Vintage,
        Effect::MaskedGlow,
        Effect::Parallax,
        Effect::GlowBars,
        Effect::Static,
    ];

    /// Parse an effect name, falling back to the static hold for anything
    /// outside the known set.
    pub fn parse_or_static(s: &str) -> Effect {
        s.parse().unwrap_or(Effect::Static)
    }

    /// Whether this effect needs a segmentation mask input.
    pub fn requires_mask(&self) -> bool {
        matches!(self, Effect::MaskedGlow | Effect::Parallax)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Zoom => "zoom",
            Effect::Pulse => "pulse",
            Effect::Waves => "waves",
            Effect::Spectrum => "spectrum",
            Effect::GlowSpectrum => "glow_spectrum",
            Effect::BarsBottom => "bars_bottom",
            Effect::DualWaves => "dual_waves",
            Effect::NeonBars => "neon_bars",
            Effect::Vintage => "vintage",
            Effect::MaskedGlow => "masked_glow",
            Effect::Parallax => "parallax",
            Effect::GlowBars => "glow_bars",
            Effect::Static => "static",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Effect {
    type Err = EffectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = Effect::ALL.iter().find(|e| e.as_str() == s.to_lowercase());
        found.copied().ok_or_else(|| EffectParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown effect: {0}")]
pub struct EffectParseError(String);

/// Frame orientation for a rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// 16:9 landscape, used for full tracks and compilations
    #[default]
    Horizontal,
    /// 9:16 portrait, used for short clips
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for effect in Effect::ALL {
            assert_eq!(effect.as_str().parse::<Effect>().unwrap(), *effect);
        }
    }

    #[test]
    fn test_parse_or_static() {
        assert_eq!(Effect::parse_or_static("glow_bars"), Effect::GlowBars);
        assert_eq!(Effect::parse_or_static("laser_cats"), Effect::Static);
        assert_eq!(Effect::parse_or_static(""), Effect::Static);
    }

    #[test]
    fn test_requires_mask() {
        assert!(Effect::MaskedGlow.requires_mask());
        assert!(Effect::Parallax.requires_mask());
        assert!(!Effect::GlowBars.requires_mask());
    }
}
