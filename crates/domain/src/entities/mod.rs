//! Entities - domain objects with identity

pub mod profile;

pub use profile::{BaseRole, Profile, ProfileReference, DEFAULT_COMBAT_SYSTEM};
