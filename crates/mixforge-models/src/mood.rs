//! Mood classification data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coarse emotional/energy classification of a track.
///
/// Declaration order is the tie-break priority used by the classifier;
/// `rank()` gives the separate calm-to-energetic order used for sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Chill,
    Party,
    Deep,
    Fusion,
}

impl Mood {
    /// All moods, in classifier tie-break order.
    pub const ALL: &'static [Mood] = &[Mood::Chill, Mood::Party, Mood::Deep, Mood::Fusion];

    /// Sequencing rank: compilations flow from calm to energetic.
    pub fn rank(&self) -> u8 {
        match self {
            Mood::Chill => 0,
            Mood::Deep => 1,
            Mood::Fusion => 2,
            Mood::Party => 3,
        }
    }

    /// Keyword list used for description-based classification.
    ///
    /// Configuration data, not logic: matched as lowercase substrings.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Chill => &[
                "nostalgic", "chill", "mellow", "relax", "warm", "soft", "gentle", "calm",
                "ambient", "study",
            ],
            Mood::Party => &[
                "party", "dance", "energy", "club", "hype", "bass", "upbeat", "groove", "bounce",
                "high energy",
            ],
            Mood::Deep => &[
                "deep", "soulful", "emotional", "introspective", "melancholic", "reflective",
                "moody",
            ],
            Mood::Fusion => &[
                "fusion", "world", "experimental", "hausa", "fuji", "afrobeat", "goje",
                "traditional", "ethnic",
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Chill => "chill",
            Mood::Party => "party",
            Mood::Deep => "deep",
            Mood::Fusion => "fusion",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = MoodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chill" => Ok(Mood::Chill),
            "party" => Ok(Mood::Party),
            "deep" => Ok(Mood::Deep),
            "fusion" => Ok(Mood::Fusion),
            _ => Err(MoodParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown mood: {0}")]
pub struct MoodParseError(String);
