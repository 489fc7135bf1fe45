//! Value objects - immutable types defined by their attributes

pub mod axes;
pub mod session_layer;
pub mod tier;
pub mod trait_vector;
pub mod tropes;
pub mod voice;

pub use axes::{AxisPreferences, CompositionAxes, NarrativeFocus, PowerExpression, TensionSource};
pub use session_layer::SessionLayer;
pub use tier::{NarrativeMode, PowerDifferential, PowerTier, DEFAULT_TIER, DEFAULT_TIER_TAG};
pub use trait_vector::{trait_keys, TraitScore, TraitVector};
pub use tropes::{trope_keys, TropeSet};
pub use voice::VoiceCard;
