//! Profile blender
//!
//! Merges an ordered list of weighted base profiles into one composite:
//!
//! - **Traits**: weighted mean per key, missing keys read as 5, rounded half up
//! - **Tone**: same formula, but only over bases that declare a tone vector
//! - **Tropes**: union; a trope active in any base is active in the blend
//! - **Mechanics and voice**: copied from the authoritative base
//! - **Voice cards**: concatenated in base order, duplicates kept
//! - **Axes**: re-classified from the blended traits and tropes
//!
//! The authoritative base is the first one marked primary, or the first in
//! list order when none is.

use std::collections::BTreeSet;

use crate::composition::classifier;
use crate::entities::{Profile, ProfileReference};
use crate::ids::{ProfileId, SessionId};
use crate::value_objects::{TraitScore, TraitVector, TropeSet, VoiceCard};

/// Separator between canonical titles in a composite name.
pub const TITLE_SEPARATOR: &str = " × ";

/// A reference paired with the base profile it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBase {
    pub reference: ProfileReference,
    pub profile: Profile,
}

impl LoadedBase {
    pub fn new(reference: ProfileReference, profile: Profile) -> Self {
        Self { reference, profile }
    }

    fn weight(&self) -> f64 {
        self.reference.effective_weight()
    }

    fn title(&self) -> &str {
        let title = self.reference.canonical_title.trim();
        if title.is_empty() {
            &self.profile.name
        } else {
            title
        }
    }
}

/// Index of the authoritative entry: first primary, else the first entry.
pub fn authoritative_index(references: &[&ProfileReference]) -> usize {
    references
        .iter()
        .position(|reference| reference.role.is_primary())
        .unwrap_or(0)
}

/// Minimal profile for sessions that have nothing to blend.
pub fn minimal_profile(session_id: &SessionId) -> Profile {
    Profile::new(ProfileId::custom_for(session_id), "Custom Profile")
        .with_source("custom")
        .with_derived_axes()
}

/// Named profile for sessions whose bases could not be loaded at all.
pub fn fallback_profile(session_id: &SessionId) -> Profile {
    Profile::new(ProfileId::fallback_for(session_id), "Fallback Profile")
        .with_source("fallback")
        .with_derived_axes()
}

/// Blend `bases` into one profile for `session_id`.
///
/// An empty list yields the minimal profile and a single base is returned
/// as-is (with axes derived if it had none).
pub fn blend(session_id: &SessionId, bases: &[LoadedBase]) -> Profile {
    match bases {
        [] => minimal_profile(session_id),
        [only] => only.profile.clone().with_derived_axes(),
        _ => blend_many(session_id, bases),
    }
}

fn blend_many(session_id: &SessionId, bases: &[LoadedBase]) -> Profile {
    let references: Vec<&ProfileReference> = bases.iter().map(|b| &b.reference).collect();
    let primary_count = references.iter().filter(|r| r.role.is_primary()).count();
    if primary_count > 1 {
        tracing::warn!(
            session_id = %session_id,
            primary_count,
            "Composition has several primary bases, using the first"
        );
    }
    let authority = &bases[authoritative_index(&references)].profile;

    let traits = weighted_vector(bases.iter().map(|b| (&b.profile.traits, b.weight())));

    let toned: Vec<(&TraitVector, f64)> = bases
        .iter()
        .filter_map(|b| b.profile.tone.as_ref().map(|tone| (tone, b.weight())))
        .collect();
    let tone = if toned.is_empty() {
        None
    } else {
        Some(weighted_vector(toned.into_iter()))
    };

    let mut tropes = TropeSet::new();
    for base in bases {
        tropes.union_with(&base.profile.tropes);
    }

    let voice_cards = concat_voice_cards(bases);

    let name = bases
        .iter()
        .map(LoadedBase::title)
        .collect::<Vec<_>>()
        .join(TITLE_SEPARATOR);

    let composition = classifier::classify(&traits, &tropes);

    Profile {
        id: ProfileId::composite_for(session_id),
        name,
        source: "composite".to_string(),
        version: 1,
        traits,
        tropes,
        combat_system: authority.combat_system.clone(),
        power_system: authority.power_system.clone(),
        progression: authority.progression.clone(),
        tone,
        composition: Some(composition),
        voice: authority.voice.clone(),
        author_voice: authority.author_voice.clone(),
        voice_cards,
        world_tier: authority.world_tier.clone(),
        starting_era: None,
        custom_rules: None,
        blend_notes: None,
    }
}

/// Weighted mean of every key across `vectors`, missing keys reading as 5.
///
/// A zero total weight is treated as 1.0.
fn weighted_vector<'a, I>(vectors: I) -> TraitVector
where
    I: Iterator<Item = (&'a TraitVector, f64)> + Clone,
{
    let total: f64 = vectors.clone().map(|(_, weight)| weight).sum();
    let total = if total == 0.0 { 1.0 } else { total };

    let keys: BTreeSet<&str> = vectors.clone().flat_map(|(vector, _)| vector.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let weighted: f64 = vectors
                .clone()
                .map(|(vector, weight)| f64::from(vector.score(key)) * weight)
                .sum();
            (key, i64::from(TraitScore::from_average(weighted / total).value()))
        })
        .collect()
}

fn concat_voice_cards(bases: &[LoadedBase]) -> Option<Vec<VoiceCard>> {
    if bases.iter().all(|b| b.profile.voice_cards.is_none()) {
        return None;
    }
    Some(
        bases
            .iter()
            .filter_map(|b| b.profile.voice_cards.as_ref())
            .flatten()
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BaseRole;
    use crate::value_objects::{trait_keys, trope_keys, CompositionAxes, NarrativeFocus, TensionSource};

    fn base(id: &str, role: BaseRole, weight: f64) -> LoadedBase {
        LoadedBase::new(
            ProfileReference::new(ProfileId::new(id), id.to_uppercase(), role).with_weight(weight),
            Profile::new(ProfileId::new(id), id),
        )
    }

    fn session() -> SessionId {
        SessionId::new("s1")
    }

    #[test]
    fn empty_list_returns_minimal_profile() {
        let profile = blend(&session(), &[]);
        assert_eq!(profile.id.as_str(), "custom_s1");
        assert!(profile.traits.is_empty());
        assert!(profile.tropes.is_empty());
        assert_eq!(profile.composition, Some(CompositionAxes::default()));
    }

    #[test]
    fn single_base_is_returned_unchanged() {
        let mut only = base("frieren", BaseRole::Primary, 1.0);
        only.profile = only
            .profile
            .with_trait(trait_keys::COMEDY_VS_DRAMA, 4)
            .with_composition(CompositionAxes::default());
        let profile = blend(&session(), std::slice::from_ref(&only));
        assert_eq!(profile, only.profile);
    }

    #[test]
    fn weighted_traits_follow_the_formula() {
        let mut a = base("a", BaseRole::Primary, 2.0);
        let mut b = base("b", BaseRole::Supplementary, 1.0);
        a.profile.traits.set("action", 8);
        b.profile.traits.set("action", 2);

        let profile = blend(&session(), &[a, b]);
        // round(8 * 2/3 + 2 * 1/3) = round(6.0)
        assert_eq!(profile.traits.score("action"), 6);
    }

    #[test]
    fn missing_trait_counts_as_midpoint() {
        let mut a = base("a", BaseRole::Primary, 1.0);
        let b = base("b", BaseRole::Supplementary, 1.0);
        a.profile.traits.set("darkness", 10);

        let profile = blend(&session(), &[a, b]);
        // (10 + 5) / 2 = 7.5, rounds half up
        assert_eq!(profile.traits.score("darkness"), 8);
    }

    #[test]
    fn zero_total_weight_is_treated_as_one() {
        let mut a = base("a", BaseRole::Primary, 0.0);
        let mut b = base("b", BaseRole::Supplementary, 0.0);
        a.profile.traits.set("action", 8);
        b.profile.traits.set("action", 6);

        let profile = blend(&session(), &[a, b]);
        assert_eq!(profile.traits.get("action").map(TraitScore::value), Some(0));
    }

    #[test]
    fn tone_blends_only_over_declaring_bases() {
        let mut a = base("a", BaseRole::Primary, 1.0);
        let b = base("b", BaseRole::Supplementary, 3.0);
        a.profile.tone = Some(TraitVector::new().with("darkness", 9));

        let profile = blend(&session(), &[a, b]);
        assert_eq!(profile.tone.as_ref().map(|t| t.score("darkness")), Some(9));
    }

    #[test]
    fn tone_weights_only_declaring_bases_and_fills_missing_keys_with_midpoint() {
        let mut a = base("a", BaseRole::Primary, 2.0);
        let mut b = base("b", BaseRole::Supplementary, 1.0);
        let c = base("c", BaseRole::Flavor, 10.0);
        a.profile.tone = Some(TraitVector::new().with("darkness", 9).with("humor", 3));
        b.profile.tone = Some(TraitVector::new().with("darkness", 3).with("melancholy", 8));

        let tone = blend(&session(), &[a, b, c]).tone.expect("blended tone");

        // (9*2 + 3*1) / 3; the undeclared base's weight of 10 is not counted
        assert_eq!(tone.score("darkness"), 7);
        // (3*2 + 5*1) / 3 = 3.67, b reads as midpoint
        assert_eq!(tone.score("humor"), 4);
        // (5*2 + 8*1) / 3 = 6, a reads as midpoint
        assert_eq!(tone.score("melancholy"), 6);
        assert_eq!(tone.len(), 3);
    }

    #[test]
    fn tone_is_omitted_when_no_base_declares_one() {
        let profile = blend(
            &session(),
            &[base("a", BaseRole::Primary, 1.0), base("b", BaseRole::Flavor, 1.0)],
        );
        assert!(profile.tone.is_none());
    }

    #[test]
    fn tropes_are_unioned() {
        let mut a = base("a", BaseRole::Primary, 5.0);
        let mut b = base("b", BaseRole::Flavor, 0.1);
        a.profile.tropes.set(trope_keys::TOURNAMENT, false);
        b.profile.tropes.set(trope_keys::TOURNAMENT, true);
        b.profile.tropes.set(trope_keys::BETRAYAL, false);

        let profile = blend(&session(), &[a, b]);
        assert!(profile.tropes.is_active(trope_keys::TOURNAMENT));
        assert!(!profile.tropes.is_active(trope_keys::BETRAYAL));
    }

    #[test]
    fn mechanics_come_from_the_primary_base() {
        let mut flavor = base("flavor", BaseRole::Flavor, 1.0);
        let mut primary = base("primary", BaseRole::Primary, 1.0);
        flavor.profile.combat_system = "spirit".into();
        flavor.profile.world_tier = "T2".into();
        primary.profile.combat_system = "nen".into();
        primary.profile.voice = "terse".into();
        primary.profile.power_system = Some(serde_json::json!({"name": "Nen"}));
        primary.profile.world_tier = "T6".into();

        let profile = blend(&session(), &[flavor, primary]);
        assert_eq!(profile.combat_system, "nen");
        assert_eq!(profile.voice, "terse");
        assert_eq!(profile.power_system, Some(serde_json::json!({"name": "Nen"})));
        assert_eq!(profile.world_tier, "T6");
    }

    #[test]
    fn first_base_is_authoritative_without_a_primary() {
        let mut a = base("a", BaseRole::Supplementary, 1.0);
        let mut b = base("b", BaseRole::Flavor, 1.0);
        a.profile.combat_system = "first".into();
        b.profile.combat_system = "second".into();

        assert_eq!(blend(&session(), &[a, b]).combat_system, "first");
    }

    #[test]
    fn voice_cards_are_concatenated_in_order() {
        let mut a = base("a", BaseRole::Primary, 1.0);
        let b = base("b", BaseRole::Flavor, 1.0);
        let mut c = base("c", BaseRole::Flavor, 1.0);
        a.profile.voice_cards = Some(vec![VoiceCard::new("Gon")]);
        c.profile.voice_cards = Some(vec![VoiceCard::new("Ichigo"), VoiceCard::new("Gon")]);

        let cards = blend(&session(), &[a, b, c]).voice_cards.expect("cards");
        let speakers: Vec<&str> = cards.iter().map(|c| c.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Gon", "Ichigo", "Gon"]);
    }

    #[test]
    fn composite_identity_comes_from_session_and_titles() {
        let profile = blend(
            &session(),
            &[base("hxh", BaseRole::Primary, 1.0), base("bleach", BaseRole::Flavor, 1.0)],
        );
        assert_eq!(profile.id.as_str(), "composite_s1");
        assert_eq!(profile.name, "HXH × BLEACH");
    }

    #[test]
    fn axes_are_reclassified_after_blending() {
        let explicit = CompositionAxes::new(
            TensionSource::Burden,
            crate::value_objects::PowerExpression::Sealed,
            NarrativeFocus::Legacy,
        );
        let mut a = base("a", BaseRole::Primary, 1.0);
        let mut b = base("b", BaseRole::Flavor, 1.0);
        a.profile.composition = Some(explicit);
        a.profile.tropes.set(trope_keys::TOURNAMENT, true);
        b.profile.composition = Some(explicit);

        let axes = blend(&session(), &[a, b]).composition.expect("axes");
        assert_ne!(axes, explicit);
        assert_eq!(axes.narrative_focus, NarrativeFocus::Competition);
    }
}
