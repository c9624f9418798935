//! Per-effect filter graph construction.
//!
//! One parameterized builder replaces the per-effect command strings of a
//! typical shell pipeline: every effect is expressed over a shared stage
//! vocabulary (scale/crop cover, zoompan, frequency strips, glow, alpha
//! ramp, masked pulse, fades, text) and returns a validated [`FilterGraph`].
//!
//! Input label conventions (the segment renderer adds inputs in this
//! order): `0:v` looped background image, `1:a` audio, `2:v` looped mask.

use std::path::PathBuf;

use mixforge_models::{Effect, Orientation, VideoSettings};

use crate::error::MediaResult;
use crate::graph::{FilterGraph, FilterStage};
use crate::sanitize::escape_text;

/// Visualizer strip height for landscape output.
pub const VISUALIZER_HEIGHT: u32 = 150;
/// Visualizer strip height for portrait shorts.
pub const VISUALIZER_HEIGHT_VERTICAL: u32 = 250;
/// Fade in/out duration in seconds.
pub const FADE_DURATION: f64 = 1.0;
/// Zoom factor cap; long tracks must not zoom past this.
pub const MAX_ZOOM: f64 = 1.5;

/// Per-frame zoom increments. Landscape segments run for whole tracks, so
/// the rate is lower than for 45-second shorts.
const ZOOM_RATE: f64 = 0.00015;
const ZOOM_RATE_VERTICAL: f64 = 0.0003;

const BAR_COLORS: &str = "0xFFAA00|0xFF6600|0xFF3300";

/// Everything needed to compose one rendered segment.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub audio: PathBuf,
    pub image: PathBuf,
    pub mask: Option<PathBuf>,
    /// Output duration in seconds
    pub duration: f64,
    /// Offset into the audio asset (used for short-clip hook windows)
    pub audio_start: f64,
    pub title: Option<String>,
    pub effect: Effect,
    pub orientation: Orientation,
}

impl SegmentSpec {
    pub fn new(audio: impl Into<PathBuf>, image: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            audio: audio.into(),
            image: image.into(),
            mask: None,
            duration,
            audio_start: 0.0,
            title: None,
            effect: Effect::default(),
            orientation: Orientation::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.is_empty() {
            self.title = Some(title);
        }
        self
    }

    pub fn with_mask(mut self, mask: Option<PathBuf>) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_audio_start(mut self, start: f64) -> Self {
        self.audio_start = start;
        self
    }
}

/// Frames for a clip: round, not truncate, so a 29.99s track still covers
/// its full audio.
pub fn frame_count(duration: f64, fps: u32) -> u32 {
    (duration * fps as f64).round() as u32
}

fn strip_height(orientation: Orientation) -> u32 {
    match orientation {
        Orientation::Horizontal => VISUALIZER_HEIGHT,
        Orientation::Vertical => VISUALIZER_HEIGHT_VERTICAL,
    }
}

fn zoom_rate(orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Horizontal => ZOOM_RATE,
        Orientation::Vertical => ZOOM_RATE_VERTICAL,
    }
}

/// Title/handle placement and sizing per orientation.
struct TextLayout {
    title_size: u32,
    title_y: &'static str,
    title_border: u32,
    channel_size: u32,
    channel_y: &'static str,
}

fn text_layout(orientation: Orientation) -> TextLayout {
    match orientation {
        Orientation::Horizontal => TextLayout {
            title_size: 48,
            title_y: "100",
            title_border: 3,
            channel_size: 32,
            channel_y: "50",
        },
        Orientation::Vertical => TextLayout {
            title_size: 56,
            title_y: "150",
            title_border: 4,
            channel_size: 32,
            channel_y: "h-280",
        },
    }
}

/// Build the full graph for a segment spec.
///
/// `Static` (and any unknown effect parsed to it) takes the minimal path:
/// the scaled image held for the clip with audio, no animation, fades or
/// overlays. Every other effect gets global fades plus text overlays on
/// top of its effect-specific body.
pub fn build_segment_graph(spec: &SegmentSpec, settings: &VideoSettings) -> MediaResult<FilterGraph> {
    let settings = settings.for_orientation(spec.orientation);
    let mut g = FilterGraph::new();

    if spec.effect == Effect::Static {
        let base = scale_cover(&mut g, "0:v", "base", &settings);
        g.set_video_out(base);
        g.set_audio_out("1:a");
        g.validate()?;
        return Ok(g);
    }

    let body = build_effect_body(&mut g, spec, &settings);
    let faded = apply_fades(&mut g, &body, spec.duration);
    let texted = apply_text(&mut g, &faded, spec, &settings);

    g.set_video_out(texted);
    g.set_audio_out("1:a");
    g.validate()?;
    Ok(g)
}

/// Build the known-good fallback graph: base transform plus a plain
/// frequency strip, nothing else. Used for the one retry after a failed
/// render.
pub fn build_fallback_graph(spec: &SegmentSpec, settings: &VideoSettings) -> MediaResult<FilterGraph> {
    let settings = settings.for_orientation(spec.orientation);
    let mut g = FilterGraph::new();

    let base = scale_cover(&mut g, "0:v", "base", &settings);
    let zoomed = zoompan(&mut g, &base, "bg", zoom_rate(spec.orientation), spec, &settings);

    let strip = strip_height(spec.orientation);
    g.push(
        FilterStage::new("showfreqs")
            .input("1:a")
            .param("s", format!("{}x{}", settings.width, strip))
            .param("mode", "bar")
            .param("ascale", "sqrt")
            .param("fscale", "log")
            .param("colors", BAR_COLORS)
            .param("win_size", 1024)
            .output("bars"),
    );
    let out = overlay(&mut g, &zoomed, "bars", "v", "0", &format!("H-{}", strip));

    g.set_video_out(out);
    g.set_audio_out("1:a");
    g.validate()?;
    Ok(g)
}

/// Effect-specific composition; returns the label of the composed frame.
fn build_effect_body(g: &mut FilterGraph, spec: &SegmentSpec, settings: &VideoSettings) -> String {
    let rate = zoom_rate(spec.orientation);
    let strip = strip_height(spec.orientation);
    let width = settings.width;

    match spec.effect {
        Effect::Static => unreachable!("static handled by build_segment_graph"),

        Effect::Zoom => {
            let base = scale_cover(g, "0:v", "base", settings);
            zoompan(g, &base, "v_zoom", rate, spec, settings)
        }

        Effect::Pulse => {
            let base = scale_cover(g, "0:v", "base", settings);
            g.push(
                FilterStage::new("hue")
                    .input(base)
                    .param("h", "t*15")
                    .param("s", "1+0.3*sin(t*2)")
                    .output("v_hue"),
            );
            "v_hue".to_string()
        }

        Effect::Waves => {
            let bg = scale_cover(g, "0:v", "bg", settings);
            g.push(
                FilterStage::new("showwaves")
                    .input("1:a")
                    .param("s", format!("{}x200", width))
                    .param("mode", "line")
                    .param("colors", "cyan|violet")
                    .param("rate", settings.fps)
                    .output("waves"),
            );
            overlay(g, &bg, "waves", "v_waves", "0", "H-200")
        }

        Effect::Spectrum => {
            let bg = scale_cover(g, "0:v", "bg", settings);
            g.push(
                FilterStage::new("showcqt")
                    .input("1:a")
                    .param("s", format!("{}x240", width))
                    .param("text", 0)
                    .param("r", settings.fps)
                    .param("axis", 0)
                    .param("count", 10)
                    .param("sono_h", 120)
                    .param("bar_h", 120)
                    .output("cqt"),
            );
            overlay(g, &bg, "cqt", "v_cqt", "0", "H-240")
        }

        Effect::GlowSpectrum => {
            let base = scale_cover(g, "0:v", "base", settings);
            let bg = zoompan(g, &base, "bg", rate, spec, settings);
            g.push(
                FilterStage::new("showfreqs")
                    .input("1:a")
                    .param("s", "800x200")
                    .param("mode", "bar")
                    .param("ascale", "log")
                    .param("fscale", "log")
                    .param("colors", "violet|blue|cyan")
                    .param("win_size", 2048)
                    .output("freq"),
            );
            g.push(FilterStage::new("gblur").input("freq").param("sigma", 3).output("freq_soft"));
            g.push(FilterStage::new("format").input("freq_soft").arg("rgba").output("freq_rgba"));
            g.push(
                FilterStage::new("colorchannelmixer")
                    .input("freq_rgba")
                    .param("aa", 0.85)
                    .output("freq_glow"),
            );
            overlay(g, &bg, "freq_glow", "v_gspec", "(W-w)/2", "H-220")
        }

        Effect::BarsBottom => {
            let base = scale_cover(g, "0:v", "base", settings);
            let bg = zoompan(g, &base, "bg", rate, spec, settings);
            g.push(
                FilterStage::new("showfreqs")
                    .input("1:a")
                    .param("s", format!("{}x150", width))
                    .param("mode", "bar")
                    .param("colors", "white|cyan|magenta")
                    .param("ascale", "log")
                    .param("fscale", "log")
                    .param("win_size", 4096)
                    .output("bars"),
            );
            g.push(FilterStage::new("format").input("bars").arg("rgba").output("bars_rgba"));
            g.push(
                FilterStage::new("colorchannelmixer")
                    .input("bars_rgba")
                    .param("aa", 0.7)
                    .output("bars_soft"),
            );
            overlay(g, &bg, "bars_soft", "v_bars", "0", "H-150")
        }

        Effect::DualWaves => {
            let bg = scale_cover(g, "0:v", "bg", settings);
            g.push(
                FilterStage::new("asplit")
                    .input("1:a")
                    .output("wave_a1")
                    .output("wave_a2"),
            );
            g.push(
                FilterStage::new("showwaves")
                    .input("wave_a1")
                    .param("s", format!("{}x120", width))
                    .param("mode", "cline")
                    .param("colors", "cyan|white")
                    .param("rate", settings.fps)
                    .output("wave_top"),
            );
            g.push(
                FilterStage::new("showwaves")
                    .input("wave_a2")
                    .param("s", format!("{}x120", width))
                    .param("mode", "cline")
                    .param("colors", "magenta|white")
                    .param("rate", settings.fps)
                    .output("wave_bot_raw"),
            );
            g.push(FilterStage::new("vflip").input("wave_bot_raw").output("wave_bot"));
            let mid = overlay(g, &bg, "wave_top", "v_mid", "0", "30");
            overlay(g, &mid, "wave_bot", "v_dual", "0", "H-150")
        }

        Effect::NeonBars => {
            let base = scale_cover(g, "0:v", "base", settings);
            let zoomed = zoompan(g, &base, "bg_zoom", rate, spec, settings);
            g.push(
                FilterStage::new("eq")
                    .input(zoomed)
                    .param("brightness", 0.06)
                    .param("saturation", 1.2)
                    .output("bg"),
            );
            g.push(
                FilterStage::new("asplit")
                    .input("1:a")
                    .output("neon_a1")
                    .output("neon_a2"),
            );
            let bar_params = |stage: FilterStage| {
                stage
                    .param("s", format!("{}x180", width))
                    .param("mode", "bar")
                    .param("colors", "0x00ffff|0xff00ff|0xffff00")
                    .param("ascale", "log")
                    .param("fscale", "log")
                    .param("win_size", 2048)
            };
            g.push(bar_params(FilterStage::new("showfreqs").input("neon_a1")).output("neon_bars"));
            g.push(bar_params(FilterStage::new("showfreqs").input("neon_a2")).output("reflect_raw"));
            g.push(FilterStage::new("vflip").input("reflect_raw").output("reflect_flip"));
            g.push(
                FilterStage::new("colorchannelmixer")
                    .input("reflect_flip")
                    .param("aa", 0.3)
                    .output("reflect"),
            );
            g.push(FilterStage::new("gblur").input("neon_bars").param("sigma", 2).output("neon_glow"));
            let with_bars = overlay(g, "bg", "neon_glow", "v_withbars", "0", "H-200");
            overlay(g, &with_bars, "reflect", "v_neon", "0", "H-20")
        }

        Effect::Vintage => {
            let base = scale_cover(g, "0:v", "base", settings);
            g.push(
                FilterStage::new("noise")
                    .input(base)
                    .param("alls", 15)
                    .param("allf", "t+u")
                    .output("grainy"),
            );
            g.push(FilterStage::new("vignette").input("grainy").arg("PI/4").output("framed"));
            g.push(
                FilterStage::new("colorbalance")
                    .input("framed")
                    .param("rs", ".1")
                    .param("gs", "-.05")
                    .param("bs", "-.1")
                    .param("rm", ".1")
                    .param("gm", "-.05")
                    .param("bm", "-.1")
                    .param("rh", ".1")
                    .param("gh", "-.05")
                    .param("bh", "-.1")
                    .output("v_vintage"),
            );
            "v_vintage".to_string()
        }

        Effect::MaskedGlow => {
            let bg = scale_cover(g, "0:v", "bg", settings);
            if spec.mask.is_none() {
                // No mask to target; degrade to the plain zoom body.
                return zoompan(g, &bg, "v_zoom", rate, spec, settings);
            }
            let merged = masked_pulse(g, &bg, "merged", settings);
            zoompan(g, &merged, "v_masked", 0.0002, spec, settings)
        }

        Effect::Parallax => {
            let base = scale_cover(g, "0:v", "base", settings);
            if spec.mask.is_none() {
                return zoompan(g, &base, "v_zoom", rate, spec, settings);
            }
            g.push(
                FilterStage::new("split")
                    .input(base)
                    .output("plx_bg_src")
                    .output("plx_fg_src"),
            );
            // Background zooms slowly and is softened to hide the region
            // revealed behind the foreground.
            let bg_zoom = zoompan(g, "plx_bg_src", "plx_bg_zoom", 0.0002, spec, settings);
            g.push(FilterStage::new("gblur").input(bg_zoom).param("sigma", 2).output("plx_bg"));
            let mask = prepare_mask(g, settings);
            g.push(
                FilterStage::new("alphamerge")
                    .input("plx_fg_src")
                    .input(mask)
                    .output("plx_fg_rgba"),
            );
            let fg_zoom = zoompan(g, "plx_fg_rgba", "plx_fg", 0.0005, spec, settings);
            overlay(g, "plx_bg", &fg_zoom, "v_plx", "0", "0")
        }

        Effect::GlowBars => {
            // The full compilation look: every stage category in order.
            let base = scale_cover(g, "0:v", "base", settings);
            let zoomed = zoompan(g, &base, "bg_zoom", rate, spec, settings);
            let vignette_angle = match spec.orientation {
                Orientation::Horizontal => "PI/5",
                Orientation::Vertical => "PI/4",
            };
            g.push(
                FilterStage::new("vignette")
                    .input(zoomed)
                    .arg(vignette_angle)
                    .output("bg"),
            );

            // Masked-region pulse applies to the base layer and is omitted
            // entirely when no mask is supplied.
            let bg = if spec.mask.is_some() {
                masked_pulse(g, "bg", "bg_fx", settings)
            } else {
                "bg".to_string()
            };

            g.push(
                FilterStage::new("showfreqs")
                    .input("1:a")
                    .param("s", format!("{}x{}", width, strip))
                    .param("mode", "bar")
                    .param("ascale", "sqrt")
                    .param("fscale", "log")
                    .param("colors", BAR_COLORS)
                    .param("win_size", 1024)
                    .output("bars_raw"),
            );

            let (sigma, opacity) = match spec.orientation {
                Orientation::Horizontal => (6, 0.8),
                Orientation::Vertical => (8, 0.9),
            };
            g.push(
                FilterStage::new("split")
                    .input("bars_raw")
                    .output("bars_b1")
                    .output("bars_b2"),
            );
            g.push(FilterStage::new("gblur").input("bars_b1").param("sigma", sigma).output("bars_blur"));
            g.push(
                FilterStage::new("blend")
                    .input("bars_blur")
                    .input("bars_b2")
                    .param("all_mode", "screen")
                    .param("all_opacity", opacity)
                    .output("bars_glow"),
            );

            // Alpha ramp so the strip dissolves away from its bottom anchor.
            g.push(FilterStage::new("format").input("bars_glow").arg("rgba").output("bars_rgba"));
            g.push(
                FilterStage::new("geq")
                    .input("bars_rgba")
                    .param("r", "r(X,Y)")
                    .param("g", "g(X,Y)")
                    .param("b", "b(X,Y)")
                    .param("a", format!("alpha(X,Y)*min(1,(H-Y)/{}*1.5)", strip))
                    .output("bars_fade"),
            );

            overlay(g, &bg, "bars_fade", "v_glowbars", "0", &format!("H-{}", strip))
        }
    }
}

/// Scale the source image to cover the target frame, then center-crop to
/// exact dimensions. Returns the output label.
fn scale_cover(g: &mut FilterGraph, input: &str, out: &str, settings: &VideoSettings) -> String {
    let scaled = format!("{}_sc", out);
    g.push(
        FilterStage::new("scale")
            .input(input)
            .param("w", settings.width)
            .param("h", settings.height)
            .param("force_original_aspect_ratio", "increase")
            .output(scaled.clone()),
    );
    g.push(
        FilterStage::new("crop")
            .input(scaled)
            .param("w", settings.width)
            .param("h", settings.height)
            .output(out),
    );
    out.to_string()
}

/// Ken Burns slow zoom driven by the output frame index, capped at
/// [`MAX_ZOOM`] so long tracks never run away.
fn zoompan(
    g: &mut FilterGraph,
    input: &str,
    out: &str,
    rate: f64,
    spec: &SegmentSpec,
    settings: &VideoSettings,
) -> String {
    let frames = frame_count(spec.duration, settings.fps);
    g.push(
        FilterStage::new("zoompan")
            .input(input)
            .param("z", format!("min(1+{}*on,{})", rate, MAX_ZOOM))
            .param("x", "iw/2-(iw/zoom/2)")
            .param("y", "ih/2-(ih/zoom/2)")
            .param("d", frames)
            .param("s", format!("{}x{}", settings.width, settings.height))
            .param("fps", settings.fps)
            .output(out),
    );
    out.to_string()
}

fn overlay(g: &mut FilterGraph, base: &str, top: &str, out: &str, x: &str, y: &str) -> String {
    g.push(
        FilterStage::new("overlay")
            .input(base)
            .input(top)
            .param("x", x)
            .param("y", y)
            .param("format", "auto")
            .output(out),
    );
    out.to_string()
}

/// Scale the mask input to frame size and flatten it to grayscale.
fn prepare_mask(g: &mut FilterGraph, settings: &VideoSettings) -> String {
    g.push(
        FilterStage::new("scale")
            .input("2:v")
            .param("w", settings.width)
            .param("h", settings.height)
            .output("mask_sc"),
    );
    g.push(FilterStage::new("format").input("mask_sc").arg("gray").output("mask"));
    "mask".to_string()
}

/// Periodic color/brightness pulse applied only inside the mask region.
///
/// The pulse is a function of the frame index, not audio amplitude: the
/// motion is visually periodic rather than literally beat-synced.
fn masked_pulse(g: &mut FilterGraph, base: &str, out: &str, settings: &VideoSettings) -> String {
    let mask = prepare_mask(g, settings);
    let fps = settings.fps;
    g.push(
        FilterStage::new("split")
            .input(base)
            .output("pulse_base")
            .output("pulse_src"),
    );
    g.push(
        FilterStage::new("geq")
            .input("pulse_src")
            .param("lum", format!("lum(X,Y)*(1.2+0.3*sin(N/{}*3))", fps))
            .param("cb", format!("cb(X,Y)+30*sin(N/{}*2.5)", fps))
            .param("cr", format!("cr(X,Y)+40*sin(N/{}*2)", fps))
            .output("pulse_geq"),
    );
    g.push(FilterStage::new("gblur").input("pulse_geq").param("sigma", 3).output("pulse_glow"));
    g.push(
        FilterStage::new("maskedmerge")
            .input("pulse_base")
            .input("pulse_glow")
            .input(mask)
            .output(out),
    );
    out.to_string()
}

/// Fade in from black at the start, out to black ending exactly at the
/// clip end. When the clip is shorter than two fades the out-fade start
/// clamps to zero rather than inverting.
fn apply_fades(g: &mut FilterGraph, input: &str, duration: f64) -> String {
    let fade_out_start = (duration - FADE_DURATION).max(0.0);
    g.push(
        FilterStage::new("fade")
            .input(input)
            .param("t", "in")
            .param("st", 0)
            .param("d", FADE_DURATION)
            .output("fade_in"),
    );
    g.push(
        FilterStage::new("fade")
            .input("fade_in")
            .param("t", "out")
            .param("st", format!("{:.3}", fade_out_start))
            .param("d", FADE_DURATION)
            .output("faded"),
    );
    "faded".to_string()
}

/// Title (when present) and channel handle overlays.
fn apply_text(
    g: &mut FilterGraph,
    input: &str,
    spec: &SegmentSpec,
    settings: &VideoSettings,
) -> String {
    let layout = text_layout(spec.orientation);
    let mut current = input.to_string();

    if let Some(title) = &spec.title {
        g.push(
            FilterStage::new("drawtext")
                .input(current)
                .param("text", escape_text(title))
                .param("x", "(w-text_w)/2")
                .param("y", layout.title_y)
                .param("fontsize", layout.title_size)
                .param("fontcolor", "white")
                .param("borderw", layout.title_border)
                .param("bordercolor", "black@0.7")
                .output("titled"),
        );
        current = "titled".to_string();
    }

    g.push(
        FilterStage::new("drawtext")
            .input(current)
            .param("text", escape_text(&settings.channel_handle))
            .param("x", "(w-text_w)/2")
            .param("y", layout.channel_y)
            .param("fontsize", layout.channel_size)
            .param("fontcolor", "white@0.9")
            .param("borderw", 2)
            .param("bordercolor", "black@0.6")
            .output("v"),
    );
    "v".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixforge_models::Effect;

    fn spec(effect: Effect) -> SegmentSpec {
        SegmentSpec::new("track.mp3", "bg.png", 200.0)
            .with_title("Sunset Drive")
            .with_effect(effect)
    }

    fn stage_names(g: &FilterGraph) -> Vec<&str> {
        g.stages().iter().map(|s| s.filter_name()).collect()
    }

    #[test]
    fn test_all_effects_validate() {
        for effect in Effect::ALL {
            let mut s = spec(*effect);
            if effect.requires_mask() {
                s.mask = Some("mask.png".into());
            }
            let g = build_segment_graph(&s, &VideoSettings::default())
                .unwrap_or_else(|e| panic!("{} failed: {}", effect, e));
            assert!(!g.video_out().is_empty());
            assert_eq!(g.audio_out(), "1:a");
        }
    }

    #[test]
    fn test_static_is_minimal() {
        let g = build_segment_graph(&spec(Effect::Static), &VideoSettings::default()).unwrap();
        let names = stage_names(&g);
        assert_eq!(names, vec!["scale", "crop"]);
    }

    #[test]
    fn test_glow_bars_contains_all_categories() {
        let g = build_segment_graph(&spec(Effect::GlowBars), &VideoSettings::default()).unwrap();
        let names = stage_names(&g);
        for expected in [
            "zoompan", "vignette", "showfreqs", "split", "gblur", "blend", "geq", "overlay",
            "fade", "drawtext",
        ] {
            assert!(names.contains(&expected), "missing stage {}", expected);
        }
    }

    #[test]
    fn test_mask_adds_stages_only() {
        let without = build_segment_graph(&spec(Effect::GlowBars), &VideoSettings::default()).unwrap();
        let mut masked_spec = spec(Effect::GlowBars);
        masked_spec.mask = Some("mask.png".into());
        let with = build_segment_graph(&masked_spec, &VideoSettings::default()).unwrap();

        assert!(with.stages().len() > without.stages().len());
        assert!(with.uses_mask_input());
        assert!(!without.uses_mask_input());

        // The unmasked graph's stages all appear, in order, in the masked
        // one; the mask path only inserts stages.
        let masked_names = stage_names(&with);
        let mut cursor = 0;
        for name in stage_names(&without) {
            let pos = masked_names[cursor..]
                .iter()
                .position(|n| *n == name)
                .unwrap_or_else(|| panic!("stage {} missing from masked graph", name));
            cursor += pos + 1;
        }
        assert!(masked_names.contains(&"maskedmerge"));
    }

    #[test]
    fn test_masked_effect_without_mask_degrades() {
        let g = build_segment_graph(&spec(Effect::MaskedGlow), &VideoSettings::default()).unwrap();
        assert!(!g.uses_mask_input());
        assert!(!stage_names(&g).contains(&"maskedmerge"));
    }

    #[test]
    fn test_short_clip_fade_out_clamped() {
        let mut s = spec(Effect::GlowBars);
        s.duration = 0.5; // shorter than two fades
        let g = build_segment_graph(&s, &VideoSettings::default()).unwrap();
        let fade_out = g
            .stages()
            .iter()
            .filter(|st| st.filter_name() == "fade")
            .nth(1)
            .unwrap();
        let st = fade_out
            .params()
            .iter()
            .find(|p| p.key.as_deref() == Some("st"))
            .unwrap();
        assert_eq!(st.value, "0.000");
    }

    #[test]
    fn test_fallback_graph_is_plain() {
        let mut s = spec(Effect::GlowBars);
        s.mask = Some("mask.png".into());
        let g = build_fallback_graph(&s, &VideoSettings::default()).unwrap();
        let names = stage_names(&g);
        for forbidden in ["gblur", "blend", "maskedmerge", "drawtext", "fade"] {
            assert!(!names.contains(&forbidden), "fallback contains {}", forbidden);
        }
        assert!(names.contains(&"showfreqs"));
        assert!(!g.uses_mask_input());
    }

    #[test]
    fn test_frame_count_rounds() {
        assert_eq!(frame_count(200.0, 30), 6000);
        assert_eq!(frame_count(29.99, 30), 900);
        assert_eq!(frame_count(0.016, 30), 0);
    }

    #[test]
    fn test_vertical_layout_dimensions() {
        let s = spec(Effect::GlowBars).with_orientation(Orientation::Vertical);
        let g = build_segment_graph(&s, &VideoSettings::default()).unwrap();
        let rendered = g.render();
        assert!(rendered.contains("1080x1920"));
        assert!(rendered.contains(&format!("H-{}", VISUALIZER_HEIGHT_VERTICAL)));
    }

    #[test]
    fn test_title_escaping_flows_through() {
        let s = SegmentSpec::new("a.mp3", "i.png", 60.0)
            .with_title("Mix: 'Live'")
            .with_effect(Effect::Zoom);
        let g = build_segment_graph(&s, &VideoSettings::default()).unwrap();
        assert!(g.render().contains("Mix\\: \\'Live\\'"));
    }
}
