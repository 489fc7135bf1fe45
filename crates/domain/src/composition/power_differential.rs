//! Power differential resolver
//!
//! Computes, for one narrative turn, how the gap between a character's tier
//! and the setting's (or current threat's) tier reshapes the composition
//! axes. Nothing here touches the stored composition; callers run it fresh
//! each turn with that turn's live tiers.
//!
//! # Modes
//!
//! | differential | mode        | axes (overpowered mode on)                         |
//! |--------------|-------------|----------------------------------------------------|
//! | < 2          | standard    | setting's axes                                     |
//! | 2..=3        | blended     | character's tension + power, setting's focus       |
//! | >= 4         | op_dominant | character's choice on all three                    |
//!
//! Without overpowered mode every differential behaves as standard. Any
//! character slot left unset falls back to the setting's value.

use serde::{Deserialize, Serialize};

use crate::entities::Profile;
use crate::value_objects::{AxisPreferences, CompositionAxes, NarrativeMode, PowerDifferential};

/// Live tier inputs for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPowerInput {
    /// Setting tier. Falls back to the profile's tier when absent.
    #[serde(default)]
    pub baseline_tier: Option<String>,
    #[serde(default)]
    pub character_tier: Option<String>,
    /// Tier of the current threat; replaces the baseline when present.
    #[serde(default)]
    pub threat_tier: Option<String>,
    /// Player opted into an overpowered protagonist
    #[serde(default)]
    pub op_enabled: bool,
    #[serde(default)]
    pub op_axes: AxisPreferences,
}

impl TurnPowerInput {
    pub fn new(character_tier: impl Into<String>) -> Self {
        Self {
            character_tier: Some(character_tier.into()),
            ..Self::default()
        }
    }

    pub fn with_baseline_tier(mut self, tier: impl Into<String>) -> Self {
        self.baseline_tier = Some(tier.into());
        self
    }

    pub fn with_threat_tier(mut self, tier: impl Into<String>) -> Self {
        self.threat_tier = Some(tier.into());
        self
    }

    pub fn with_op_mode(mut self, axes: AxisPreferences) -> Self {
        self.op_enabled = true;
        self.op_axes = axes;
        self
    }
}

/// The framing to use for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveFraming {
    pub axes: CompositionAxes,
    /// Mode actually applied. `Standard` whenever overpowered mode is off.
    pub mode: NarrativeMode,
    /// Mode the differential alone calls for.
    pub classified_mode: NarrativeMode,
    pub differential: PowerDifferential,
    pub description: String,
}

impl EffectiveFraming {
    /// Render as guidance lines for the narrative generator.
    pub fn to_prompt(&self) -> String {
        format!(
            "Power framing: {} (differential {}: {} vs character {})\n{}",
            self.description,
            self.differential.value,
            self.differential.comparison_tier,
            self.differential.character_tier,
            self.axes.to_prompt()
        )
    }
}

/// Compute the turn's framing from a resolved profile and live tiers.
pub fn effective_axes(profile: &Profile, input: &TurnPowerInput) -> EffectiveFraming {
    let baseline = profile.axes_or_derived();
    let baseline_tier = given(&input.baseline_tier).unwrap_or(profile.world_tier.as_str());

    let differential = PowerDifferential::compute(
        Some(baseline_tier),
        input.character_tier.as_deref(),
        given(&input.threat_tier),
    );
    let classified_mode = differential.mode();
    let mode = if input.op_enabled {
        classified_mode
    } else {
        NarrativeMode::Standard
    };

    let chosen = &input.op_axes;
    let axes = match mode {
        NarrativeMode::Standard => baseline,
        NarrativeMode::Blended => CompositionAxes {
            tension_source: chosen.tension_source.unwrap_or(baseline.tension_source),
            power_expression: chosen.power_expression.unwrap_or(baseline.power_expression),
            narrative_focus: baseline.narrative_focus,
        },
        NarrativeMode::OpDominant => CompositionAxes {
            tension_source: chosen.tension_source.unwrap_or(baseline.tension_source),
            power_expression: chosen.power_expression.unwrap_or(baseline.power_expression),
            narrative_focus: chosen.narrative_focus.unwrap_or(baseline.narrative_focus),
        },
    };

    EffectiveFraming {
        axes,
        mode,
        classified_mode,
        differential,
        description: mode.description().to_string(),
    }
}

/// A tier tag that was actually filled in; blank counts as absent.
fn given(tag: &Option<String>) -> Option<&str> {
    tag.as_deref().filter(|t| !t.trim().is_empty())
}
