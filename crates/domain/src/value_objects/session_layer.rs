//! Session-scoped player overrides
//!
//! Every field is optional. A present field replaces the resolved value
//! outright; an absent one leaves the blended value untouched.

use serde::{Deserialize, Serialize};

use crate::value_objects::TraitVector;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLayer {
    /// Sparse tone overrides, merged key by key after blending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_overrides: Option<TraitVector>,
    /// Replaces the setting tier verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_ceiling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_era: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_notes: Option<String>,
}

impl SessionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tone_override(mut self, key: impl Into<String>, value: i64) -> Self {
        self.tone_overrides
            .get_or_insert_with(TraitVector::new)
            .set(key, value);
        self
    }

    pub fn with_power_ceiling(mut self, tier: impl Into<String>) -> Self {
        self.power_ceiling = Some(tier.into());
        self
    }

    pub fn with_starting_era(mut self, era: impl Into<String>) -> Self {
        self.starting_era = Some(era.into());
        self
    }

    pub fn with_custom_rule(mut self, rule: impl Into<String>) -> Self {
        self.custom_rules.get_or_insert_with(Vec::new).push(rule.into());
        self
    }

    pub fn with_blend_notes(mut self, notes: impl Into<String>) -> Self {
        self.blend_notes = Some(notes.into());
        self
    }

    /// True when applying this layer would change nothing.
    pub fn is_empty(&self) -> bool {
        self.tone_overrides.is_none()
            && self.power_ceiling.is_none()
            && self.starting_era.is_none()
            && self.custom_rules.is_none()
            && self.blend_notes.is_none()
    }
}
