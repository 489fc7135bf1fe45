//! Per-speaker dialogue guidance

use serde::{Deserialize, Serialize};

/// Dialogue guidance for one recurring speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceCard {
    pub speaker: String,
    #[serde(default)]
    pub speech_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_line: Option<String>,
}

impl VoiceCard {
    pub fn new(speaker: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.speech_patterns.push(pattern.into());
        self
    }

    pub fn with_humor(mut self, humor: impl Into<String>) -> Self {
        self.humor = Some(humor.into());
        self
    }

    pub fn with_sample_line(mut self, line: impl Into<String>) -> Self {
        self.sample_line = Some(line.into());
        self
    }
}
