//! Composition axis classifier
//!
//! Derives the three composition axes from a trait vector and a trope set.
//! Each axis is an ordered rule table: the first rule whose predicate holds
//! wins, and the table's default applies when none does. Classification is
//! total and pure.
//!
//! Score bands on the 0-10 scale (missing traits read as 5):
//!
//! | band     | range |
//! |----------|-------|
//! | very low | 0-2   |
//! | low      | 0-3   |
//! | mid      | 4-6   |
//! | high     | 7-10  |
//!
//! "Low X" always means the score of the trait named after X is in the low
//! band, e.g. "low drama" is a low `comedy_vs_drama` score.

use crate::value_objects::{
    trait_keys as t, trope_keys as tr, CompositionAxes, NarrativeFocus, PowerExpression,
    TensionSource, TraitVector, TropeSet,
};

const LOW_MAX: u8 = 3;
const VERY_LOW_MAX: u8 = 2;
const HIGH_MIN: u8 = 7;

fn low(score: u8) -> bool {
    score <= LOW_MAX
}

fn very_low(score: u8) -> bool {
    score <= VERY_LOW_MAX
}

fn mid(score: u8) -> bool {
    score > LOW_MAX && score < HIGH_MIN
}

fn high(score: u8) -> bool {
    score >= HIGH_MIN
}

/// Read-only view over the classifier's inputs.
#[derive(Debug, Clone, Copy)]
pub struct Signals<'a> {
    traits: &'a TraitVector,
    tropes: &'a TropeSet,
}

impl<'a> Signals<'a> {
    pub fn new(traits: &'a TraitVector, tropes: &'a TropeSet) -> Self {
        Self { traits, tropes }
    }

    fn score(&self, key: &str) -> u8 {
        self.traits.score(key)
    }

    fn trope(&self, key: &str) -> bool {
        self.tropes.is_active(key)
    }
}

/// One classification rule.
#[derive(Clone, Copy)]
pub struct Rule<T> {
    pub name: &'static str,
    pub when: fn(&Signals<'_>) -> bool,
    pub then: T,
}

/// An ordered rule table with an explicit default.
pub struct RuleSet<T: 'static> {
    pub rules: &'static [Rule<T>],
    pub default: T,
}

impl<T: Copy> RuleSet<T> {
    /// Value of the first matching rule, or the default.
    pub fn evaluate(&self, signals: &Signals<'_>) -> T {
        self.first_match(signals)
            .map(|rule| rule.then)
            .unwrap_or(self.default)
    }

    /// The rule that decides `signals`, if any. Useful for explaining a
    /// classification.
    pub fn first_match(&self, signals: &Signals<'_>) -> Option<&'static Rule<T>> {
        self.rules.iter().find(|rule| (rule.when)(signals))
    }
}

pub static TENSION_RULES: RuleSet<TensionSource> = RuleSet {
    rules: &[
        Rule {
            name: "low introspection and low drama",
            when: |s| low(s.score(t::INTROSPECTION_VS_ACTION)) && low(s.score(t::COMEDY_VS_DRAMA)),
            then: TensionSource::Relational,
        },
        Rule {
            name: "high cynicism and low power fantasy",
            when: |s| {
                high(s.score(t::HOPE_VS_CYNICISM)) && low(s.score(t::POWER_FANTASY_VS_STRUGGLE))
            },
            then: TensionSource::Moral,
        },
        Rule {
            name: "very low power fantasy",
            when: |s| very_low(s.score(t::POWER_FANTASY_VS_STRUGGLE)),
            then: TensionSource::Existential,
        },
        Rule {
            name: "betrayal or politics",
            when: |s| s.trope(tr::BETRAYAL) || s.trope(tr::POLITICS),
            then: TensionSource::Consequence,
        },
        Rule {
            name: "internal corruption",
            when: |s| s.trope(tr::INTERNAL_CORRUPTION),
            then: TensionSource::Control,
        },
        Rule {
            name: "mystery or high comedy-drama",
            when: |s| s.trope(tr::MYSTERY) || high(s.score(t::COMEDY_VS_DRAMA)),
            then: TensionSource::Information,
        },
        Rule {
            name: "tragic backstory and high cynicism",
            when: |s| s.trope(tr::TRAGIC_BACKSTORY) && high(s.score(t::HOPE_VS_CYNICISM)),
            then: TensionSource::Burden,
        },
    ],
    default: TensionSource::Existential,
};

pub static POWER_RULES: RuleSet<PowerExpression> = RuleSet {
    rules: &[
        Rule {
            name: "fast pace and high absurdity",
            when: |s| low(s.score(t::FAST_PACED_VS_SLOW_BURN)) && high(s.score(t::GROUNDED_VS_ABSURD)),
            then: PowerExpression::Instantaneous,
        },
        Rule {
            name: "low absurdity and slow pace",
            when: |s| low(s.score(t::GROUNDED_VS_ABSURD)) && high(s.score(t::FAST_PACED_VS_SLOW_BURN)),
            then: PowerExpression::Sealed,
        },
        Rule {
            name: "low absurdity and low tactical",
            when: |s| low(s.score(t::GROUNDED_VS_ABSURD)) && low(s.score(t::TACTICAL_VS_INSTINCTIVE)),
            then: PowerExpression::Hidden,
        },
        Rule {
            name: "high absurdity and high serialization",
            when: |s| high(s.score(t::GROUNDED_VS_ABSURD)) && high(s.score(t::EPISODIC_VS_SERIALIZED)),
            then: PowerExpression::Overwhelming,
        },
        Rule {
            name: "low ensemble score",
            when: |s| low(s.score(t::ENSEMBLE_VS_SOLO)),
            then: PowerExpression::Derivative,
        },
        Rule {
            name: "low tactical and mid absurdity",
            when: |s| low(s.score(t::TACTICAL_VS_INSTINCTIVE)) && mid(s.score(t::GROUNDED_VS_ABSURD)),
            then: PowerExpression::Conditional,
        },
    ],
    default: PowerExpression::Flashy,
};

pub static FOCUS_RULES: RuleSet<NarrativeFocus> = RuleSet {
    rules: &[
        Rule {
            name: "low ensemble score",
            when: |s| low(s.score(t::ENSEMBLE_VS_SOLO)),
            then: NarrativeFocus::Ensemble,
        },
        Rule {
            name: "high solo score and low introspection",
            when: |s| high(s.score(t::ENSEMBLE_VS_SOLO)) && low(s.score(t::INTROSPECTION_VS_ACTION)),
            then: NarrativeFocus::Internal,
        },
        Rule {
            name: "low episodic score",
            when: |s| low(s.score(t::EPISODIC_VS_SERIALIZED)),
            then: NarrativeFocus::Episodic,
        },
        Rule {
            name: "politics or nation building",
            when: |s| s.trope(tr::POLITICS) || s.trope(tr::NATION_BUILDING),
            then: NarrativeFocus::Faction,
        },
        Rule {
            name: "slice of life, or high comedy and low introspection",
            when: |s| {
                s.trope(tr::SLICE_OF_LIFE)
                    || (high(s.score(t::COMEDY_VS_DRAMA)) && low(s.score(t::INTROSPECTION_VS_ACTION)))
            },
            then: NarrativeFocus::Mundane,
        },
        Rule {
            name: "tournament",
            when: |s| s.trope(tr::TOURNAMENT),
            then: NarrativeFocus::Competition,
        },
        Rule {
            name: "mentor death and moderate ensemble",
            when: |s| s.trope(tr::MENTOR_DEATH) && mid(s.score(t::ENSEMBLE_VS_SOLO)),
            then: NarrativeFocus::Legacy,
        },
    ],
    default: NarrativeFocus::Party,
};

pub fn tension_source(traits: &TraitVector, tropes: &TropeSet) -> TensionSource {
    TENSION_RULES.evaluate(&Signals::new(traits, tropes))
}

pub fn power_expression(traits: &TraitVector, tropes: &TropeSet) -> PowerExpression {
    POWER_RULES.evaluate(&Signals::new(traits, tropes))
}

pub fn narrative_focus(traits: &TraitVector, tropes: &TropeSet) -> NarrativeFocus {
    FOCUS_RULES.evaluate(&Signals::new(traits, tropes))
}

/// Classify all three axes.
pub fn classify(traits: &TraitVector, tropes: &TropeSet) -> CompositionAxes {
    let signals = Signals::new(traits, tropes);
    CompositionAxes {
        tension_source: TENSION_RULES.evaluate(&signals),
        power_expression: POWER_RULES.evaluate(&signals),
        narrative_focus: FOCUS_RULES.evaluate(&signals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits(pairs: &[(&str, i64)]) -> TraitVector {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn tropes(keys: &[&str]) -> TropeSet {
        keys.iter().map(|k| (*k, true)).collect()
    }

    #[test]
    fn empty_input_yields_baseline_triple() {
        let axes = classify(&TraitVector::new(), &TropeSet::new());
        assert_eq!(axes, CompositionAxes::default());
    }

    #[test]
    fn high_comedy_drama_alone_is_information() {
        let axes = classify(&traits(&[(t::COMEDY_VS_DRAMA, 8)]), &TropeSet::new());
        assert_eq!(axes.tension_source, TensionSource::Information);
    }

    // ── Tension source ───────────────────────────────────────────────────

    #[test]
    fn relational_needs_both_low_introspection_and_low_drama() {
        let both = traits(&[(t::INTROSPECTION_VS_ACTION, 2), (t::COMEDY_VS_DRAMA, 3)]);
        assert_eq!(tension_source(&both, &TropeSet::new()), TensionSource::Relational);

        let one = traits(&[(t::INTROSPECTION_VS_ACTION, 2)]);
        assert_eq!(tension_source(&one, &TropeSet::new()), TensionSource::Existential);
    }

    #[test]
    fn moral_beats_very_low_power_fantasy() {
        let input = traits(&[(t::HOPE_VS_CYNICISM, 8), (t::POWER_FANTASY_VS_STRUGGLE, 1)]);
        assert_eq!(tension_source(&input, &TropeSet::new()), TensionSource::Moral);
    }

    #[test]
    fn very_low_power_fantasy_is_existential_before_tropes() {
        let input = traits(&[(t::POWER_FANTASY_VS_STRUGGLE, 2)]);
        assert_eq!(
            tension_source(&input, &tropes(&[tr::BETRAYAL])),
            TensionSource::Existential
        );
    }

    #[test]
    fn trope_driven_tension_sources() {
        let none = TraitVector::new();
        assert_eq!(tension_source(&none, &tropes(&[tr::POLITICS])), TensionSource::Consequence);
        assert_eq!(
            tension_source(&none, &tropes(&[tr::INTERNAL_CORRUPTION])),
            TensionSource::Control
        );
        assert_eq!(tension_source(&none, &tropes(&[tr::MYSTERY])), TensionSource::Information);
    }

    #[test]
    fn betrayal_outranks_corruption() {
        let both = tropes(&[tr::BETRAYAL, tr::INTERNAL_CORRUPTION]);
        assert_eq!(tension_source(&TraitVector::new(), &both), TensionSource::Consequence);
    }

    #[test]
    fn burden_needs_tragic_backstory_and_cynicism() {
        let cynical = traits(&[(t::HOPE_VS_CYNICISM, 9)]);
        assert_eq!(
            tension_source(&cynical, &tropes(&[tr::TRAGIC_BACKSTORY])),
            TensionSource::Burden
        );
        assert_eq!(
            tension_source(&TraitVector::new(), &tropes(&[tr::TRAGIC_BACKSTORY])),
            TensionSource::Existential
        );
    }

    #[test]
    fn false_trope_flags_do_not_fire() {
        let set: TropeSet = [(tr::MYSTERY, false)].into_iter().collect();
        assert_eq!(tension_source(&TraitVector::new(), &set), TensionSource::Existential);
    }

    // ── Power expression ─────────────────────────────────────────────────

    #[test]
    fn power_expression_rules_in_order() {
        let none = TropeSet::new();
        assert_eq!(
            power_expression(&traits(&[(t::FAST_PACED_VS_SLOW_BURN, 2), (t::GROUNDED_VS_ABSURD, 8)]), &none),
            PowerExpression::Instantaneous
        );
        assert_eq!(
            power_expression(&traits(&[(t::GROUNDED_VS_ABSURD, 2), (t::FAST_PACED_VS_SLOW_BURN, 8)]), &none),
            PowerExpression::Sealed
        );
        assert_eq!(
            power_expression(&traits(&[(t::GROUNDED_VS_ABSURD, 2), (t::TACTICAL_VS_INSTINCTIVE, 1)]), &none),
            PowerExpression::Hidden
        );
        assert_eq!(
            power_expression(&traits(&[(t::GROUNDED_VS_ABSURD, 9), (t::EPISODIC_VS_SERIALIZED, 9)]), &none),
            PowerExpression::Overwhelming
        );
        assert_eq!(
            power_expression(&traits(&[(t::ENSEMBLE_VS_SOLO, 1)]), &none),
            PowerExpression::Derivative
        );
        assert_eq!(
            power_expression(&traits(&[(t::TACTICAL_VS_INSTINCTIVE, 3)]), &none),
            PowerExpression::Conditional
        );
    }

    #[test]
    fn low_tactical_with_high_absurdity_is_not_conditional() {
        let input = traits(&[(t::TACTICAL_VS_INSTINCTIVE, 3), (t::GROUNDED_VS_ABSURD, 8)]);
        assert_eq!(power_expression(&input, &TropeSet::new()), PowerExpression::Flashy);
    }

    // ── Narrative focus ──────────────────────────────────────────────────

    #[test]
    fn narrative_focus_trait_rules() {
        let none = TropeSet::new();
        assert_eq!(narrative_focus(&traits(&[(t::ENSEMBLE_VS_SOLO, 2)]), &none), NarrativeFocus::Ensemble);
        assert_eq!(
            narrative_focus(&traits(&[(t::ENSEMBLE_VS_SOLO, 8), (t::INTROSPECTION_VS_ACTION, 2)]), &none),
            NarrativeFocus::Internal
        );
        assert_eq!(
            narrative_focus(&traits(&[(t::EPISODIC_VS_SERIALIZED, 1)]), &none),
            NarrativeFocus::Episodic
        );
        assert_eq!(
            narrative_focus(&traits(&[(t::COMEDY_VS_DRAMA, 8), (t::INTROSPECTION_VS_ACTION, 3)]), &none),
            NarrativeFocus::Mundane
        );
    }

    #[test]
    fn narrative_focus_trope_rules() {
        let none = TraitVector::new();
        assert_eq!(narrative_focus(&none, &tropes(&[tr::NATION_BUILDING])), NarrativeFocus::Faction);
        assert_eq!(narrative_focus(&none, &tropes(&[tr::SLICE_OF_LIFE])), NarrativeFocus::Mundane);
        assert_eq!(narrative_focus(&none, &tropes(&[tr::TOURNAMENT])), NarrativeFocus::Competition);
        assert_eq!(narrative_focus(&none, &tropes(&[tr::MENTOR_DEATH])), NarrativeFocus::Legacy);
    }

    #[test]
    fn mentor_death_needs_moderate_ensemble() {
        let solo = traits(&[(t::ENSEMBLE_VS_SOLO, 9)]);
        assert_eq!(narrative_focus(&solo, &tropes(&[tr::MENTOR_DEATH])), NarrativeFocus::Party);
    }

    #[test]
    fn politics_outranks_tournament() {
        let both = tropes(&[tr::TOURNAMENT, tr::POLITICS]);
        assert_eq!(narrative_focus(&TraitVector::new(), &both), NarrativeFocus::Faction);
    }

    #[test]
    fn first_match_names_the_deciding_rule() {
        let input = traits(&[(t::COMEDY_VS_DRAMA, 9)]);
        let empty = TropeSet::new();
        let rule = TENSION_RULES
            .first_match(&Signals::new(&input, &empty))
            .expect("a rule should match");
        assert_eq!(rule.name, "mystery or high comedy-drama");
        assert!(FOCUS_RULES
            .first_match(&Signals::new(&TraitVector::new(), &empty))
            .is_none());
    }
}
