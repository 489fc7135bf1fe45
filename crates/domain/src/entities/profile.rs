//! Source-material profiles
//!
//! A `Profile` captures one work's tone, tropes and mechanical systems. The
//! same shape is used for a stored base profile and for the resolved profile
//! a session composition produces; the resolved one is recomputed on demand
//! and never stored.
//!
//! Optional blocks are real `Option`s: a profile with no tone vector is
//! different from a profile with an empty one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::composition::classifier;
use crate::error::DomainError;
use crate::ids::ProfileId;
use crate::value_objects::{CompositionAxes, TraitVector, TropeSet, VoiceCard, DEFAULT_TIER_TAG};

/// Combat system tag used when a profile doesn't name one.
pub const DEFAULT_COMBAT_SYSTEM: &str = "tactical";

fn default_version() -> u32 {
    1
}

fn default_combat_system() -> String {
    DEFAULT_COMBAT_SYSTEM.to_string()
}

fn default_tier() -> String {
    DEFAULT_TIER_TAG.to_string()
}

/// A source-material profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    /// Origin label, e.g. "manga" or "light novel"
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub traits: TraitVector,
    #[serde(default)]
    pub tropes: TropeSet,

    // Mechanics. Never blended; taken from the authoritative base.
    #[serde(default = "default_combat_system")]
    pub combat_system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_system: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<TraitVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionAxes>,

    // Voice
    #[serde(default)]
    pub voice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_cards: Option<Vec<VoiceCard>>,

    /// Baseline power tier of the setting, e.g. "T8"
    #[serde(default = "default_tier")]
    pub world_tier: String,

    // Advisory fields written by the session overlay. Carried through to the
    // narrative generator untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_era: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_notes: Option<String>,
}

impl Profile {
    /// Create an empty profile: no traits, no tropes, default mechanics.
    pub fn new(id: ProfileId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source: String::new(),
            version: default_version(),
            traits: TraitVector::new(),
            tropes: TropeSet::new(),
            combat_system: default_combat_system(),
            power_system: None,
            progression: None,
            tone: None,
            composition: None,
            voice: String::new(),
            author_voice: None,
            voice_cards: None,
            world_tier: default_tier(),
            starting_era: None,
            custom_rules: None,
            blend_notes: None,
        }
    }

    // ── Builder Methods ──────────────────────────────────────────────────

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_traits(mut self, traits: TraitVector) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_trait(mut self, key: impl Into<String>, value: i64) -> Self {
        self.traits.set(key, value);
        self
    }

    pub fn with_tropes(mut self, tropes: TropeSet) -> Self {
        self.tropes = tropes;
        self
    }

    pub fn with_trope(mut self, key: impl Into<String>, active: bool) -> Self {
        self.tropes.set(key, active);
        self
    }

    pub fn with_combat_system(mut self, combat_system: impl Into<String>) -> Self {
        self.combat_system = combat_system.into();
        self
    }

    pub fn with_power_system(mut self, power_system: serde_json::Value) -> Self {
        self.power_system = Some(power_system);
        self
    }

    pub fn with_progression(mut self, progression: serde_json::Value) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn with_tone(mut self, tone: TraitVector) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_composition(mut self, axes: CompositionAxes) -> Self {
        self.composition = Some(axes);
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_author_voice(mut self, author_voice: impl Into<String>) -> Self {
        self.author_voice = Some(author_voice.into());
        self
    }

    pub fn with_voice_card(mut self, card: VoiceCard) -> Self {
        self.voice_cards.get_or_insert_with(Vec::new).push(card);
        self
    }

    pub fn with_world_tier(mut self, tier: impl Into<String>) -> Self {
        self.world_tier = tier.into();
        self
    }

    // ── Derived values ───────────────────────────────────────────────────

    /// Explicit axes when the profile carries them, otherwise classified
    /// from traits and tropes.
    pub fn axes_or_derived(&self) -> CompositionAxes {
        self.composition
            .unwrap_or_else(|| classifier::classify(&self.traits, &self.tropes))
    }

    /// Same profile with `composition` filled in if it was missing.
    pub fn with_derived_axes(mut self) -> Self {
        if self.composition.is_none() {
            self.composition = Some(classifier::classify(&self.traits, &self.tropes));
        }
        self
    }
}

/// How much authority a base has inside a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseRole {
    /// Owns the mechanics that can't be blended
    Primary,
    /// Contributes traits and tropes. Assumed when a stored reference has no role.
    #[default]
    Supplementary,
    /// Light seasoning
    Flavor,
}

impl BaseRole {
    pub fn is_primary(&self) -> bool {
        matches!(self, BaseRole::Primary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseRole::Primary => "primary",
            BaseRole::Supplementary => "supplementary",
            BaseRole::Flavor => "flavor",
        }
    }
}

impl fmt::Display for BaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(BaseRole::Primary),
            "supplementary" => Ok(BaseRole::Supplementary),
            "flavor" | "flavour" => Ok(BaseRole::Flavor),
            _ => Err(DomainError::parse(format!("Unknown base role: {}", s))),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A base profile's slot inside a session composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReference {
    pub profile_id: ProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref_primary: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref_secondary: Option<i64>,
    pub canonical_title: String,
    #[serde(default)]
    pub role: BaseRole,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl ProfileReference {
    pub fn new(profile_id: ProfileId, canonical_title: impl Into<String>, role: BaseRole) -> Self {
        Self {
            profile_id,
            external_ref_primary: None,
            external_ref_secondary: None,
            canonical_title: canonical_title.into(),
            role,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_external_refs(mut self, primary: Option<i64>, secondary: Option<i64>) -> Self {
        self.external_ref_primary = primary;
        self.external_ref_secondary = secondary;
        self
    }

    /// Weight used in averaging. Non-finite and negative weights count as 0.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() {
            self.weight.max(0.0)
        } else {
            0.0
        }
    }
}
