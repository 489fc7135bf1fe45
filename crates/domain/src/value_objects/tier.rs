//! Power tiers and narrative modes
//!
//! Tiers are `T`-prefixed tags where a smaller number is stronger: `T1` is
//! cosmic, `T10` is human-scale. The gap between a character's tier and the
//! tier of the setting (or of the current threat) picks a narrative mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tier assumed whenever a tag is missing or unreadable.
pub const DEFAULT_TIER: PowerTier = PowerTier(8);

/// Default setting tier tag stored on profiles.
pub const DEFAULT_TIER_TAG: &str = "T8";

/// Readable tier levels. Anything outside is treated as unreadable.
pub const TIER_RANGE: std::ops::RangeInclusive<i32> = 0..=99;

/// A parsed power tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerTier(i32);

impl PowerTier {
    pub fn new(level: i32) -> Self {
        Self(level)
    }

    /// Parse a tier tag, degrading to `DEFAULT_TIER` on anything unreadable.
    ///
    /// A leading `T`/`t` is stripped; surrounding whitespace is ignored.
    /// Formatting slips must never halt a turn, so this never fails.
    pub fn parse_lenient(tag: Option<&str>) -> Self {
        let Some(raw) = tag else {
            return DEFAULT_TIER;
        };
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('T')
            .or_else(|| trimmed.strip_prefix('t'))
            .unwrap_or(trimmed)
            .trim();
        match digits.parse::<i32>() {
            Ok(level) if TIER_RANGE.contains(&level) => Self(level),
            _ => {
                tracing::debug!(tag = %raw, "Unreadable tier tag, using default tier");
                DEFAULT_TIER
            }
        }
    }

    #[inline]
    pub fn level(self) -> i32 {
        self.0
    }
}

impl Default for PowerTier {
    fn default() -> Self {
        DEFAULT_TIER
    }
}

impl fmt::Display for PowerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// How strongly the protagonist's own framing overrides the setting's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeMode {
    /// Traditional stakes; the setting's axes apply unchanged
    #[default]
    Standard,
    /// The character's tension and power framing mix into the setting's
    Blended,
    /// The character's framing dominates; combat no longer carries stakes
    OpDominant,
}

impl NarrativeMode {
    /// Differential at and above which the mode is `Blended`.
    pub const BLENDED_THRESHOLD: i32 = 2;
    /// Differential at and above which the mode is `OpDominant`.
    pub const OP_DOMINANT_THRESHOLD: i32 = 4;

    /// Classify a tier differential. Each band is closed on its low end.
    pub fn from_differential(differential: i32) -> Self {
        const BANDS: &[(i32, NarrativeMode)] = &[
            (NarrativeMode::OP_DOMINANT_THRESHOLD, NarrativeMode::OpDominant),
            (NarrativeMode::BLENDED_THRESHOLD, NarrativeMode::Blended),
        ];
        BANDS
            .iter()
            .find(|(floor, _)| differential >= *floor)
            .map(|(_, mode)| *mode)
            .unwrap_or(NarrativeMode::Standard)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeMode::Standard => "standard",
            NarrativeMode::Blended => "blended",
            NarrativeMode::OpDominant => "op_dominant",
        }
    }

    /// Human-readable description handed to the narrative generator.
    pub fn description(&self) -> &'static str {
        match self {
            NarrativeMode::Standard => "Standard: traditional stakes",
            NarrativeMode::Blended => {
                "Blended: the protagonist's strength reframes tension and power, \
                 while the setting's story structure persists"
            }
            NarrativeMode::OpDominant => {
                "OP dominant: combat is no longer the primary source of stakes"
            }
        }
    }
}

impl fmt::Display for NarrativeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed gap between a comparison tier and a character tier.
///
/// Positive means the character is stronger than the comparison scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerDifferential {
    pub comparison_tier: PowerTier,
    pub character_tier: PowerTier,
    pub value: i32,
}

impl PowerDifferential {
    /// Compare a character against the threat tier when one is present,
    /// otherwise against the setting's baseline tier.
    pub fn compute(
        baseline_tier: Option<&str>,
        character_tier: Option<&str>,
        threat_tier: Option<&str>,
    ) -> Self {
        let comparison_tier = match threat_tier {
            Some(tag) => PowerTier::parse_lenient(Some(tag)),
            None => PowerTier::parse_lenient(baseline_tier),
        };
        let character_tier = PowerTier::parse_lenient(character_tier);
        Self {
            comparison_tier,
            character_tier,
            value: comparison_tier.level().saturating_sub(character_tier.level()),
        }
    }

    pub fn mode(&self) -> NarrativeMode {
        NarrativeMode::from_differential(self.value)
    }
}
