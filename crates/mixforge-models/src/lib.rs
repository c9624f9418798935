//! Shared data models for the MixForge pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Tracks and their acquired assets
//! - Mood classification data
//! - Visual effects and orientations
//! - Chapters and compilation info
//! - Video/encoding configuration

pub mod chapter;
pub mod effect;
pub mod encoding;
pub mod mood;
pub mod settings;
pub mod timestamp;
pub mod track;
pub mod utils;

// Re-export common types
pub use chapter::{Chapter, CompilationInfo};
pub use effect::{Effect, Orientation};
pub use encoding::EncodingConfig;
pub use mood::Mood;
pub use settings::VideoSettings;
pub use timestamp::format_timestamp;
pub use track::Track;
pub use utils::{extract_tempo, slugify};
