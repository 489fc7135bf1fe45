//! Session composition aggregate - a session's chosen source material
//!
//! The only entity here with a persistence lifecycle: created when a
//! session's source material is first resolved, re-saved when the player
//! changes bases or overrides, deleted when the session is discarded.
//! The resolved profile is never stored; `resolve()` recomputes it.
//!
//! # Invariants
//!
//! - At most one base is marked primary (checked by `validate`)
//! - Every weight is finite and positive (checked by `validate`)
//! - `resolve()` is deterministic: the same composition and bases always
//!   produce an identical profile

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::composition::{blender, overlay, LoadedBase};
use crate::entities::{Profile, ProfileReference};
use crate::error::DomainError;
use crate::ids::{ProfileId, SessionId};
use crate::value_objects::SessionLayer;

/// How a session's bases relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompositionType {
    /// One work; only the first base counts
    #[default]
    Single,
    /// Several entries of one franchise
    FranchiseLink,
    /// Several unrelated works blended together
    CrossIpBlend,
    /// Player-authored setting with no base to blend
    Custom,

    /// Forward-compatibility fallback for unrecognized tags. Behaves as `Single`.
    #[serde(other)]
    Unknown,
}

impl CompositionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionType::Single => "single",
            CompositionType::FranchiseLink => "franchise_link",
            CompositionType::CrossIpBlend => "cross_ip_blend",
            CompositionType::Custom => "custom",
            CompositionType::Unknown => "unknown",
        }
    }

    /// Whether this type blends every base rather than taking the first.
    pub fn blends(&self) -> bool {
        matches!(
            self,
            CompositionType::FranchiseLink | CompositionType::CrossIpBlend
        )
    }
}

impl fmt::Display for CompositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single" => Ok(CompositionType::Single),
            "franchise_link" => Ok(CompositionType::FranchiseLink),
            "cross_ip_blend" => Ok(CompositionType::CrossIpBlend),
            "custom" => Ok(CompositionType::Custom),
            _ => Err(DomainError::parse(format!("Unknown composition type: {}", s))),
        }
    }
}

/// A session's source-material composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionComposition {
    session_id: SessionId,
    composition_type: CompositionType,
    #[serde(default)]
    bases: Vec<ProfileReference>,
    #[serde(default)]
    session_layer: SessionLayer,
    created_at: DateTime<Utc>,
}

impl SessionComposition {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a composition. Call `validate()` before persisting it.
    pub fn new(
        session_id: SessionId,
        composition_type: CompositionType,
        bases: Vec<ProfileReference>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            composition_type,
            bases,
            session_layer: SessionLayer::default(),
            created_at,
        }
    }

    pub fn with_layer(mut self, layer: SessionLayer) -> Self {
        self.session_layer = layer;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[inline]
    pub fn composition_type(&self) -> CompositionType {
        self.composition_type
    }

    #[inline]
    pub fn bases(&self) -> &[ProfileReference] {
        &self.bases
    }

    #[inline]
    pub fn layer(&self) -> &SessionLayer {
        &self.session_layer
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // =========================================================================
    // Mutations (re-save lifecycle; created_at is kept)
    // =========================================================================

    pub fn set_layer(&mut self, layer: SessionLayer) {
        self.session_layer = layer;
    }

    pub fn replace_bases(&mut self, composition_type: CompositionType, bases: Vec<ProfileReference>) {
        self.composition_type = composition_type;
        self.bases = bases;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Id of the authoritative base: the first primary, else the first base.
    pub fn primary_base_id(&self) -> Option<&ProfileId> {
        let references: Vec<&ProfileReference> = self.bases.iter().collect();
        if references.is_empty() {
            return None;
        }
        Some(&references[blender::authoritative_index(&references)].profile_id)
    }

    /// Every distinct base id in the composition.
    pub fn all_base_ids(&self) -> BTreeSet<ProfileId> {
        self.bases.iter().map(|b| b.profile_id.clone()).collect()
    }

    /// Check the composition can be saved.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.session_id.is_blank() {
            return Err(DomainError::validation("session id cannot be empty"));
        }

        let primaries = self.bases.iter().filter(|b| b.role.is_primary()).count();
        if primaries > 1 {
            return Err(DomainError::constraint(format!(
                "at most one base may be primary, found {}",
                primaries
            )));
        }

        for base in &self.bases {
            if base.profile_id.is_blank() {
                return Err(DomainError::validation("base profile id cannot be empty"));
            }
            if !base.weight.is_finite() || base.weight <= 0.0 {
                return Err(DomainError::validation(format!(
                    "weight for '{}' must be a positive number, got {}",
                    base.profile_id, base.weight
                )));
            }
        }

        if let Some(overrides) = &self.session_layer.tone_overrides {
            if overrides.keys().any(|key| key.trim().is_empty()) {
                return Err(DomainError::validation("tone override keys cannot be empty"));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve the effective profile: blend, then apply the session layer.
    ///
    /// `loaded` holds the bases that could be fetched, in composition order.
    /// Bases that failed to load are simply absent from it. This never fails:
    /// every degrade path yields a usable profile.
    pub fn resolve(&self, loaded: &[LoadedBase]) -> Profile {
        let blended = self.blend(loaded);
        overlay::apply(blended, &self.session_layer)
    }

    fn blend(&self, loaded: &[LoadedBase]) -> Profile {
        if self.composition_type == CompositionType::Custom || self.bases.is_empty() {
            return blender::minimal_profile(&self.session_id);
        }

        if loaded.is_empty() {
            tracing::warn!(
                session_id = %self.session_id,
                base_count = self.bases.len(),
                "No base profile could be resolved, using fallback profile"
            );
            return blender::fallback_profile(&self.session_id);
        }

        match self.composition_type {
            CompositionType::FranchiseLink | CompositionType::CrossIpBlend => {
                blender::blend(&self.session_id, loaded)
            }
            CompositionType::Unknown => {
                tracing::warn!(
                    session_id = %self.session_id,
                    "Unknown composition type, resolving as single"
                );
                blender::blend(&self.session_id, &loaded[..1])
            }
            CompositionType::Single | CompositionType::Custom => {
                blender::blend(&self.session_id, &loaded[..1])
            }
        }
    }
}
