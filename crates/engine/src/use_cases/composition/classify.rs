//! Axis classification for a single library profile.

use std::sync::Arc;

use serde::Serialize;

use canonbldr_domain::{classify, CompositionAxes, ProfileId};

use crate::infrastructure::ports::{ProfileRepo, RepoError};

/// Declared and derived axes for one base profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseAxes {
    pub profile_id: ProfileId,
    /// Axes written into the profile, if any
    pub declared: Option<CompositionAxes>,
    /// Axes the classifier derives from traits and tropes
    pub derived: CompositionAxes,
}

impl BaseAxes {
    /// Axes the blender would use: declared wins over derived.
    pub fn effective(&self) -> CompositionAxes {
        self.declared.unwrap_or(self.derived)
    }
}

pub struct ClassifyBase {
    profiles: Arc<dyn ProfileRepo>,
}

impl ClassifyBase {
    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }

    pub async fn execute(&self, profile_id: &ProfileId) -> Result<BaseAxes, ClassifyBaseError> {
        let profile = self
            .profiles
            .get(profile_id)
            .await?
            .ok_or_else(|| ClassifyBaseError::ProfileNotFound(profile_id.clone()))?;

        Ok(BaseAxes {
            profile_id: profile.id.clone(),
            declared: profile.composition,
            derived: classify(&profile.traits, &profile.tropes),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyBaseError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
