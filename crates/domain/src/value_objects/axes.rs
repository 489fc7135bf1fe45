//! Composition axes
//!
//! Three categorical descriptors summarizing how a story frames its stakes:
//!
//! - **TensionSource**: where the stakes come from
//! - **PowerExpression**: how power shows up on the page
//! - **NarrativeFocus**: whose story the narration follows
//!
//! Profiles may carry explicit axes. When they don't, the classifier in
//! `composition::classifier` derives them from traits and tropes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Normalize user-supplied axis names: `"Instant-Win"` -> `"instant_win"`.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TensionSource {
    /// Bonds between characters carry the stakes
    Relational,
    /// Right and wrong are contested
    Moral,
    /// Survival and meaning are in question
    #[default]
    Existential,
    /// Actions ripple outward and come back
    Consequence,
    /// Power corrupts or slips out of hand
    Control,
    /// Secrets and reveals drive the plot
    Information,
    /// The past weighs on the protagonist
    Burden,
}

impl TensionSource {
    pub fn all() -> &'static [TensionSource] {
        &[
            TensionSource::Relational,
            TensionSource::Moral,
            TensionSource::Existential,
            TensionSource::Consequence,
            TensionSource::Control,
            TensionSource::Information,
            TensionSource::Burden,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TensionSource::Relational => "relational",
            TensionSource::Moral => "moral",
            TensionSource::Existential => "existential",
            TensionSource::Consequence => "consequence",
            TensionSource::Control => "control",
            TensionSource::Information => "information",
            TensionSource::Burden => "burden",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            TensionSource::Relational => "stakes live in relationships; threaten bonds, not bodies",
            TensionSource::Moral => "stakes are ethical; every victory should cost something",
            TensionSource::Existential => "stakes are survival and meaning",
            TensionSource::Consequence => "actions ripple outward and return",
            TensionSource::Control => "power itself is the danger; show it slipping",
            TensionSource::Information => "withhold and reveal; the unknown is the threat",
            TensionSource::Burden => "the past weighs on every choice",
        }
    }
}

impl fmt::Display for TensionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TensionSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        TensionSource::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown tension source: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PowerExpression {
    /// Fights end in a single decisive moment
    Instantaneous,
    /// True power is locked away
    Sealed,
    /// Power is concealed from the world
    Hidden,
    /// Power dwarfs the surroundings
    Overwhelming,
    /// Power is borrowed, copied or inherited
    Derivative,
    /// Power comes with rules and costs
    Conditional,
    /// Spectacle and named techniques
    #[default]
    Flashy,
}

impl PowerExpression {
    pub fn all() -> &'static [PowerExpression] {
        &[
            PowerExpression::Instantaneous,
            PowerExpression::Sealed,
            PowerExpression::Hidden,
            PowerExpression::Overwhelming,
            PowerExpression::Derivative,
            PowerExpression::Conditional,
            PowerExpression::Flashy,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerExpression::Instantaneous => "instantaneous",
            PowerExpression::Sealed => "sealed",
            PowerExpression::Hidden => "hidden",
            PowerExpression::Overwhelming => "overwhelming",
            PowerExpression::Derivative => "derivative",
            PowerExpression::Conditional => "conditional",
            PowerExpression::Flashy => "flashy",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            PowerExpression::Instantaneous => "resolve clashes in one decisive beat",
            PowerExpression::Sealed => "true strength stays locked; hint at it",
            PowerExpression::Hidden => "power is concealed; bystanders underestimate it",
            PowerExpression::Overwhelming => "power dwarfs the scene; describe the aftermath",
            PowerExpression::Derivative => "power is borrowed or inherited; credit its source",
            PowerExpression::Conditional => "power obeys rules and costs; make them matter",
            PowerExpression::Flashy => "name the techniques and play up the spectacle",
        }
    }
}

impl fmt::Display for PowerExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerExpression {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        PowerExpression::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown power expression: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeFocus {
    /// The cast shares the spotlight
    Ensemble,
    /// The protagonist's inner life
    Internal,
    /// Self-contained adventures
    Episodic,
    /// Factions, nations and politics
    Faction,
    /// Everyday life
    Mundane,
    /// Tournaments and rankings
    Competition,
    /// What the protagonist inherits and passes on
    Legacy,
    /// A small adventuring group
    #[default]
    Party,
}

impl NarrativeFocus {
    pub fn all() -> &'static [NarrativeFocus] {
        &[
            NarrativeFocus::Ensemble,
            NarrativeFocus::Internal,
            NarrativeFocus::Episodic,
            NarrativeFocus::Faction,
            NarrativeFocus::Mundane,
            NarrativeFocus::Competition,
            NarrativeFocus::Legacy,
            NarrativeFocus::Party,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeFocus::Ensemble => "ensemble",
            NarrativeFocus::Internal => "internal",
            NarrativeFocus::Episodic => "episodic",
            NarrativeFocus::Faction => "faction",
            NarrativeFocus::Mundane => "mundane",
            NarrativeFocus::Competition => "competition",
            NarrativeFocus::Legacy => "legacy",
            NarrativeFocus::Party => "party",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            NarrativeFocus::Ensemble => "give the supporting cast real scenes",
            NarrativeFocus::Internal => "stay close to the protagonist's thoughts",
            NarrativeFocus::Episodic => "favor self-contained arcs",
            NarrativeFocus::Faction => "frame events through factions and power blocs",
            NarrativeFocus::Mundane => "let daily life carry the scene",
            NarrativeFocus::Competition => "structure conflict as matches and rankings",
            NarrativeFocus::Legacy => "tie events to what was inherited and what will remain",
            NarrativeFocus::Party => "follow the adventuring group as a unit",
        }
    }
}

impl fmt::Display for NarrativeFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NarrativeFocus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        NarrativeFocus::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown narrative focus: {}", s)))
    }
}

/// The full axis triple.
///
/// `Default` is the baseline triple the classifier returns when no rule
/// fires: existential / flashy / party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CompositionAxes {
    pub tension_source: TensionSource,
    pub power_expression: PowerExpression,
    pub narrative_focus: NarrativeFocus,
}

impl CompositionAxes {
    pub fn new(
        tension_source: TensionSource,
        power_expression: PowerExpression,
        narrative_focus: NarrativeFocus,
    ) -> Self {
        Self {
            tension_source,
            power_expression,
            narrative_focus,
        }
    }

    /// Render as guidance lines for the narrative generator.
    pub fn to_prompt(&self) -> String {
        [
            format!(
                "Tension source: {} ({})",
                self.tension_source,
                self.tension_source.guidance()
            ),
            format!(
                "Power expression: {} ({})",
                self.power_expression,
                self.power_expression.guidance()
            ),
            format!(
                "Narrative focus: {} ({})",
                self.narrative_focus,
                self.narrative_focus.guidance()
            ),
        ]
        .join("\n")
    }
}

/// Axis values a player picked for an overpowered protagonist.
///
/// Each slot is optional; an unset slot falls back to the setting's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension_source: Option<TensionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_expression: Option<PowerExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_focus: Option<NarrativeFocus>,
}

impl AxisPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tension_source(mut self, value: TensionSource) -> Self {
        self.tension_source = Some(value);
        self
    }

    pub fn with_power_expression(mut self, value: PowerExpression) -> Self {
        self.power_expression = Some(value);
        self
    }

    pub fn with_narrative_focus(mut self, value: NarrativeFocus) -> Self {
        self.narrative_focus = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "Information".parse::<TensionSource>().expect("parse"),
            TensionSource::Information
        );
        assert_eq!(
            " OVERWHELMING ".parse::<PowerExpression>().expect("parse"),
            PowerExpression::Overwhelming
        );
        assert_eq!(
            "Competition".parse::<NarrativeFocus>().expect("parse"),
            NarrativeFocus::Competition
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "vibes"
            .parse::<TensionSource>()
            .expect_err("unknown name should not parse");
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for value in NarrativeFocus::all() {
            assert_eq!(value.to_string().parse::<NarrativeFocus>().ok(), Some(*value));
        }
    }

    #[test]
    fn default_is_baseline_triple() {
        let axes = CompositionAxes::default();
        assert_eq!(axes.tension_source, TensionSource::Existential);
        assert_eq!(axes.power_expression, PowerExpression::Flashy);
        assert_eq!(axes.narrative_focus, NarrativeFocus::Party);
    }

    #[test]
    fn serializes_as_snake_case() {
        let axes = CompositionAxes::new(
            TensionSource::Burden,
            PowerExpression::Sealed,
            NarrativeFocus::Legacy,
        );
        let json = serde_json::to_value(axes).expect("serialize");
        assert_eq!(json["tension_source"], "burden");
        assert_eq!(json["power_expression"], "sealed");
        assert_eq!(json["narrative_focus"], "legacy");
    }

    #[test]
    fn prompt_lists_all_three_axes() {
        let prompt = CompositionAxes::default().to_prompt();
        assert!(prompt.contains("Tension source: existential"));
        assert!(prompt.contains("Power expression: flashy"));
        assert!(prompt.contains("Narrative focus: party"));
    }
}
