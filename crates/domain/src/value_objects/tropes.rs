//! Trope flags
//!
//! A trope set records which storytelling conventions a profile activates.
//! A key that is absent and a key set to `false` both read as inactive, but
//! an explicit `false` is preserved through blending so the blended profile
//! still lists every trope any base had an opinion on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical trope names read by the axis classifier.
pub mod trope_keys {
    pub const BETRAYAL: &str = "betrayal";
    pub const POLITICS: &str = "politics";
    pub const INTERNAL_CORRUPTION: &str = "internal_corruption";
    pub const MYSTERY: &str = "mystery";
    pub const TRAGIC_BACKSTORY: &str = "tragic_backstory";
    pub const NATION_BUILDING: &str = "nation_building";
    pub const SLICE_OF_LIFE: &str = "slice_of_life";
    pub const TOURNAMENT: &str = "tournament";
    pub const MENTOR_DEATH: &str = "mentor_death";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TropeSet(BTreeMap<String, bool>);

impl TropeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is active. Missing keys are inactive.
    pub fn is_active(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, active: bool) {
        self.0.insert(key.into(), active);
    }

    pub fn with(mut self, key: impl Into<String>, active: bool) -> Self {
        self.set(key, active);
        self
    }

    /// OR `other` into this set. A trope active anywhere stays active.
    pub fn union_with(&mut self, other: &TropeSet) {
        for (key, active) in other.iter() {
            let entry = self.0.entry(key.to_string()).or_insert(false);
            *entry = *entry || active;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for TropeSet {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut set = TropeSet::new();
        for (key, active) in iter {
            set.set(key, active);
        }
        set
    }
}
