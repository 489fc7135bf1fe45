//! Session overlay
//!
//! Applies a player's session layer on top of a resolved profile. Overrides
//! always win. Applying the same layer twice gives the same profile.

use crate::entities::Profile;
use crate::value_objects::SessionLayer;

/// Apply `layer` to `profile` and return it.
pub fn apply(mut profile: Profile, layer: &SessionLayer) -> Profile {
    if layer.is_empty() {
        return profile;
    }

    if let Some(overrides) = &layer.tone_overrides {
        match profile.tone.as_mut() {
            Some(tone) => tone.merge_from(overrides),
            None => profile.tone = Some(overrides.clone()),
        }
    }

    if let Some(ceiling) = &layer.power_ceiling {
        profile.world_tier = ceiling.clone();
    }

    // Advisory only; the narrative generator interprets these.
    if let Some(era) = &layer.starting_era {
        profile.starting_era = Some(era.clone());
    }
    if let Some(rules) = &layer.custom_rules {
        profile.custom_rules = Some(rules.clone());
    }
    if let Some(notes) = &layer.blend_notes {
        profile.blend_notes = Some(notes.clone());
    }

    profile
}
