//! Per-turn power framing.
//!
//! Resolves the session profile fresh and runs the power differential
//! resolver with the turn's live tiers. Nothing is written.

use std::sync::Arc;

use canonbldr_domain::{effective_axes, EffectiveFraming, SessionId, TurnPowerInput};

use super::resolve::{ResolveProfile, ResolveProfileError};

pub struct TurnFraming {
    resolve: Arc<ResolveProfile>,
    default_tier: String,
}

impl TurnFraming {
    /// `default_tier` is the baseline when neither the turn nor the resolved
    /// profile names one.
    pub fn new(resolve: Arc<ResolveProfile>, default_tier: impl Into<String>) -> Self {
        Self {
            resolve,
            default_tier: default_tier.into(),
        }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        mut input: TurnPowerInput,
    ) -> Result<EffectiveFraming, ResolveProfileError> {
        let profile = self.resolve.execute(session_id).await?;

        let baseline_missing = input
            .baseline_tier
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty();
        if baseline_missing && profile.world_tier.trim().is_empty() {
            input.baseline_tier = Some(self.default_tier.clone());
        }

        let framing = effective_axes(&profile, &input);
        tracing::info!(
            session_id = %session_id,
            differential = framing.differential.value,
            mode = %framing.mode,
            classified_mode = %framing.classified_mode,
            "Turn framing computed"
        );
        Ok(framing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonbldr_domain::{
        AxisPreferences, BaseRole, CompositionAxes, CompositionType, NarrativeFocus, NarrativeMode,
        PowerExpression, Profile, ProfileId, ProfileReference, SessionComposition, SessionLayer,
        TensionSource,
    };
    use chrono::{TimeZone, Utc};

    use crate::infrastructure::ports::{MockCompositionRepo, MockProfileRepo};

    fn setting_axes() -> CompositionAxes {
        CompositionAxes::new(
            TensionSource::Consequence,
            PowerExpression::Flashy,
            NarrativeFocus::Faction,
        )
    }

    fn use_case(world_tier: &str, layer: SessionLayer, default_tier: &str) -> TurnFraming {
        let created = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let composition = SessionComposition::new(
            SessionId::new("s1"),
            CompositionType::Single,
            vec![ProfileReference::new(
                ProfileId::new("setting"),
                "Setting",
                BaseRole::Primary,
            )],
            created,
        )
        .with_layer(layer);

        let mut compositions = MockCompositionRepo::new();
        compositions
            .expect_load()
            .returning(move |_| Ok(Some(composition.clone())));

        let profile = Profile::new(ProfileId::new("setting"), "Setting")
            .with_world_tier(world_tier)
            .with_composition(setting_axes());
        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .returning(move |_| Ok(Some(profile.clone())));

        let resolve = Arc::new(ResolveProfile::new(Arc::new(profiles), Arc::new(compositions)));
        TurnFraming::new(resolve, default_tier)
    }

    fn op_choices() -> AxisPreferences {
        AxisPreferences::new()
            .with_tension_source(TensionSource::Moral)
            .with_narrative_focus(NarrativeFocus::Internal)
    }

    #[tokio::test]
    async fn when_power_ceiling_set_then_it_is_the_baseline() {
        let framing = use_case("T8", SessionLayer::new().with_power_ceiling("T6"), "T8")
            .execute(
                &SessionId::new("s1"),
                TurnPowerInput::new("T4").with_op_mode(op_choices()),
            )
            .await
            .expect("framing");

        assert_eq!(framing.differential.value, 2);
        assert_eq!(framing.mode, NarrativeMode::Blended);
        assert_eq!(framing.axes.tension_source, TensionSource::Moral);
        assert_eq!(framing.axes.narrative_focus, NarrativeFocus::Faction);
    }

    #[tokio::test]
    async fn when_op_disabled_then_setting_axes_are_kept() {
        let framing = use_case("T8", SessionLayer::new(), "T8")
            .execute(&SessionId::new("s1"), TurnPowerInput::new("T2"))
            .await
            .expect("framing");

        assert_eq!(framing.classified_mode, NarrativeMode::OpDominant);
        assert_eq!(framing.mode, NarrativeMode::Standard);
        assert_eq!(framing.axes, setting_axes());
    }

    #[tokio::test]
    async fn when_profile_has_no_tier_then_configured_default_is_used() {
        let framing = use_case("", SessionLayer::new(), "T5")
            .execute(
                &SessionId::new("s1"),
                TurnPowerInput::new("T1").with_op_mode(op_choices()),
            )
            .await
            .expect("framing");

        assert_eq!(framing.differential.comparison_tier.level(), 5);
        assert_eq!(framing.differential.value, 4);
        assert_eq!(framing.mode, NarrativeMode::OpDominant);
        assert_eq!(framing.axes.narrative_focus, NarrativeFocus::Internal);
        assert_eq!(framing.axes.power_expression, PowerExpression::Flashy);
    }

    #[tokio::test]
    async fn when_baseline_and_threat_are_blank_then_configured_default_is_used() {
        let framing = use_case("", SessionLayer::new(), "T6")
            .execute(
                &SessionId::new("s1"),
                TurnPowerInput::new("T4")
                    .with_baseline_tier("")
                    .with_threat_tier(" ")
                    .with_op_mode(op_choices()),
            )
            .await
            .expect("framing");

        assert_eq!(framing.differential.comparison_tier.level(), 6);
        assert_eq!(framing.differential.value, 2);
        assert_eq!(framing.mode, NarrativeMode::Blended);
    }

    #[tokio::test]
    async fn when_threat_given_then_it_overrides_baseline() {
        let framing = use_case("T8", SessionLayer::new(), "T8")
            .execute(
                &SessionId::new("s1"),
                TurnPowerInput::new("T4")
                    .with_threat_tier("T3")
                    .with_op_mode(op_choices()),
            )
            .await
            .expect("framing");

        assert_eq!(framing.differential.value, -1);
        assert_eq!(framing.mode, NarrativeMode::Standard);
    }
}
