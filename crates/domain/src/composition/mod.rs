//! Profile composition
//!
//! Pure functions that turn base profiles and a session layer into the
//! profile the narrative generator consumes, and that frame each turn by
//! power differential. No I/O and no shared state; every input is a
//! parameter and every result is a new value.

pub mod blender;
pub mod classifier;
pub mod overlay;
pub mod power_differential;

pub use blender::{blend, fallback_profile, minimal_profile, LoadedBase, TITLE_SEPARATOR};
pub use classifier::classify;
pub use overlay::apply as apply_overlay;
pub use power_differential::{effective_axes, EffectiveFraming, TurnPowerInput};

#[cfg(test)]
mod proptests;
