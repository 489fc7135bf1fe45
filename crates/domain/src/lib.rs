pub mod aggregates;
pub mod composition;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{CompositionType, SessionComposition};
pub use composition::{
    apply_overlay, blend, classify, effective_axes, fallback_profile, minimal_profile,
    EffectiveFraming, LoadedBase, TurnPowerInput, TITLE_SEPARATOR,
};
pub use entities::{BaseRole, Profile, ProfileReference, DEFAULT_COMBAT_SYSTEM};
pub use error::DomainError;
pub use ids::{ProfileId, SessionId};
pub use value_objects::{
    trait_keys, trope_keys, AxisPreferences, CompositionAxes, NarrativeFocus, NarrativeMode,
    PowerDifferential, PowerExpression, PowerTier, SessionLayer, TensionSource, TraitScore,
    TraitVector, TropeSet, VoiceCard, DEFAULT_TIER, DEFAULT_TIER_TAG,
};
