use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::aggregates::{CompositionType, SessionComposition};
use crate::composition::{blend, overlay, LoadedBase};
use crate::entities::{BaseRole, Profile, ProfileReference};
use crate::ids::{ProfileId, SessionId};
use crate::value_objects::{NarrativeMode, SessionLayer, TraitScore, TraitVector, TropeSet};

const TROPES: [&str; 4] = ["betrayal", "mystery", "tournament", "slice_of_life"];

fn base(index: usize, weight: f64, action: i64, tropes: &[bool]) -> LoadedBase {
    let id = format!("base_{}", index);
    let role = if index == 0 {
        BaseRole::Primary
    } else {
        BaseRole::Supplementary
    };
    let trope_set: TropeSet = TROPES.iter().copied().zip(tropes.iter().copied()).collect();
    LoadedBase::new(
        ProfileReference::new(ProfileId::new(id.clone()), id.clone(), role).with_weight(weight),
        Profile::new(ProfileId::new(id), "base")
            .with_trait("action", action)
            .with_tropes(trope_set),
    )
}

fn trope_flags() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), TROPES.len())
}

proptest! {
    #[test]
    fn uniform_weights_give_rounded_mean(
        values in prop::collection::vec(0i64..=10, 2..6),
        weight in prop::sample::select(vec![0.1, 0.5, 1.0, 2.0, 3.0]),
    ) {
        let bases: Vec<LoadedBase> = values
            .iter()
            .enumerate()
            .map(|(i, v)| base(i, weight, *v, &[false; 4]))
            .collect();
        let blended = blend(&SessionId::new("prop"), &bases);

        let n = values.len() as i64;
        let sum: i64 = values.iter().sum();
        // floor(sum / n + 1/2), in integers
        let expected = (2 * sum + n) / (2 * n);
        prop_assert_eq!(i64::from(blended.traits.score("action")), expected);
    }

    #[test]
    fn tropes_follow_union(
        flags in prop::collection::vec(trope_flags(), 2..5),
        weights in prop::collection::vec(0.1f64..5.0, 5),
    ) {
        let bases: Vec<LoadedBase> = flags
            .iter()
            .enumerate()
            .map(|(i, f)| base(i, weights[i], 5, f))
            .collect();
        let blended = blend(&SessionId::new("prop"), &bases);

        for (t, trope) in TROPES.iter().enumerate() {
            let any_active = flags.iter().any(|f| f[t]);
            prop_assert_eq!(blended.tropes.is_active(trope), any_active);
        }
    }

    #[test]
    fn tone_override_always_wins(
        existing in prop::option::of(-5i64..15),
        value in -5i64..15,
    ) {
        let mut profile = Profile::new(ProfileId::new("p"), "P");
        if let Some(existing) = existing {
            profile = profile.with_tone(TraitVector::new().with("darkness", existing));
        }
        let layer = SessionLayer::new().with_tone_override("darkness", value);

        let resolved = overlay::apply(profile, &layer);
        let tone = resolved.tone.unwrap_or_default();
        prop_assert_eq!(tone.get("darkness"), Some(TraitScore::new(value)));
    }

    #[test]
    fn resolve_is_bit_identical(
        values in prop::collection::vec(0i64..=10, 1..4),
        flags in trope_flags(),
        ceiling in "T[0-9]{1,2}",
    ) {
        let bases: Vec<LoadedBase> = values
            .iter()
            .enumerate()
            .map(|(i, v)| base(i, 1.0 + i as f64, *v, &flags))
            .collect();
        let created = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let composition = SessionComposition::new(
            SessionId::new("prop"),
            CompositionType::CrossIpBlend,
            bases.iter().map(|b| b.reference.clone()).collect(),
            created,
        )
        .with_layer(SessionLayer::new().with_power_ceiling(ceiling).with_tone_override("humor", 3));

        let first = serde_json::to_vec(&composition.resolve(&bases)).expect("serialize");
        let second = serde_json::to_vec(&composition.resolve(&bases)).expect("serialize");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn scores_always_within_scale(value in any::<i64>()) {
        let score = TraitScore::new(value).value();
        prop_assert!(score <= TraitScore::MAX);
    }

    #[test]
    fn mode_never_weakens_as_differential_grows(differential in -20i32..20) {
        let rank = |mode: NarrativeMode| match mode {
            NarrativeMode::Standard => 0,
            NarrativeMode::Blended => 1,
            NarrativeMode::OpDominant => 2,
        };
        prop_assert!(
            rank(NarrativeMode::from_differential(differential))
                <= rank(NarrativeMode::from_differential(differential + 1))
        );
    }
}
