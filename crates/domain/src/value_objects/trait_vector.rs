//! Trait scores and trait vectors
//!
//! A trait vector maps a stylistic dimension (e.g. `comedy_vs_drama`) to a
//! score on a 0-10 scale. The same shape is used for a profile's tone vector.
//!
//! # Invariants
//!
//! - Every stored score is within 0..=10. Out-of-range input, including
//!   values read back from storage, is clamped rather than rejected.
//! - A key missing from a vector reads as the midpoint (5) wherever the
//!   blender or classifier looks it up.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical trait names read by the axis classifier.
pub mod trait_keys {
    pub const COMEDY_VS_DRAMA: &str = "comedy_vs_drama";
    pub const HOPE_VS_CYNICISM: &str = "hope_vs_cynicism";
    pub const POWER_FANTASY_VS_STRUGGLE: &str = "power_fantasy_vs_struggle";
    pub const INTROSPECTION_VS_ACTION: &str = "introspection_vs_action";
    pub const GROUNDED_VS_ABSURD: &str = "grounded_vs_absurd";
    pub const TACTICAL_VS_INSTINCTIVE: &str = "tactical_vs_instinctive";
    pub const FAST_PACED_VS_SLOW_BURN: &str = "fast_paced_vs_slow_burn";
    pub const EPISODIC_VS_SERIALIZED: &str = "episodic_vs_serialized";
    pub const ENSEMBLE_VS_SOLO: &str = "ensemble_vs_solo";
}

const ROUNDING_TOLERANCE: f64 = 1e-9;

/// A single 0-10 trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct TraitScore(u8);

impl TraitScore {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 10;
    pub const MIDPOINT: TraitScore = TraitScore(5);

    /// Build a score, clamping into 0..=10.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Build a score from a blended average, rounding half up.
    ///
    /// Averages that land within `ROUNDING_TOLERANCE` below a half still
    /// round up, so weights like 0.1 don't turn 5.5 into 5.
    pub fn from_average(value: f64) -> Self {
        if !value.is_finite() {
            return Self::MIDPOINT;
        }
        Self::new((value + 0.5 + ROUNDING_TOLERANCE).floor() as i64)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for TraitScore {
    fn default() -> Self {
        Self::MIDPOINT
    }
}

impl From<i64> for TraitScore {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<TraitScore> for u8 {
    fn from(score: TraitScore) -> Self {
        score.0
    }
}

impl fmt::Display for TraitScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered mapping from trait name to score.
///
/// Ordered so that two resolutions of the same inputs serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitVector(BTreeMap<String, TraitScore>);

impl TraitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for `key`, or `None` when the vector does not declare it.
    pub fn get(&self, key: &str) -> Option<TraitScore> {
        self.0.get(key).copied()
    }

    /// Score for `key`, reading a missing key as the midpoint.
    pub fn score(&self, key: &str) -> u8 {
        self.get(key).unwrap_or(TraitScore::MIDPOINT).value()
    }

    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.0.insert(key.into(), TraitScore::new(value));
    }

    pub fn with(mut self, key: impl Into<String>, value: i64) -> Self {
        self.set(key, value);
        self
    }

    /// Replace each key present in `overrides`; leave every other key alone.
    pub fn merge_from(&mut self, overrides: &TraitVector) {
        for (key, score) in overrides.iter() {
            self.0.insert(key.to_string(), score);
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TraitScore)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for TraitVector {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut vector = TraitVector::new();
        for (key, value) in iter {
            vector.set(key, value);
        }
        vector
    }
}
