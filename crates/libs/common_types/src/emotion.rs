use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Facial emotion labels recognized by the trained classifier.
///
/// The variant order matches the index order of the model's output layer, so
/// `from_index` can map an argmax straight to a label. Changing the order (or
/// the set) breaks compatibility with the model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgusted,
    Fearful,
    Happy,
    Neutral,
    Sad,
    Surprised,
}

impl Emotion {
    /// All labels in model output order.
    pub const ALL: [Self; 7] = [
        Self::Angry,
        Self::Disgusted,
        Self::Fearful,
        Self::Happy,
        Self::Neutral,
        Self::Sad,
        Self::Surprised,
    ];

    /// Maps a classifier output index to its label.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Disgusted => "disgusted",
            Self::Fearful => "fearful",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Surprised => "surprised",
        }
    }

    /// Genre keyword used when searching the music catalog for this emotion.
    #[must_use]
    pub const fn genre(self) -> &'static str {
        match self {
            Self::Angry => "rock",
            Self::Disgusted => "electronic",
            Self::Fearful => "ambient",
            Self::Happy => "pop",
            Self::Sad => "blues",
            Self::Surprised => "dance",
            Self::Neutral => "lo-fi",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown emotion label: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|emotion| emotion.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}
