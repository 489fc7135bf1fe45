//! Resolve a session's effective profile.
//!
//! Loads the stored composition and each referenced base, then hands them to
//! the domain for blending and overlay. A base that is missing or fails to
//! load is logged and skipped; resolution itself never fails once the
//! composition is found.

use std::sync::Arc;

use canonbldr_domain::{
    CompositionType, LoadedBase, Profile, SessionComposition, SessionId,
};

use crate::infrastructure::ports::{CompositionRepo, ProfileRepo, RepoError};

pub struct ResolveProfile {
    profiles: Arc<dyn ProfileRepo>,
    compositions: Arc<dyn CompositionRepo>,
}

impl ResolveProfile {
    pub fn new(profiles: Arc<dyn ProfileRepo>, compositions: Arc<dyn CompositionRepo>) -> Self {
        Self {
            profiles,
            compositions,
        }
    }

    /// Resolve the profile for `session_id`.
    ///
    /// # Returns
    /// * `Ok(Profile)` - the resolved profile, possibly a fallback
    /// * `Err(ResolveProfileError::NoComposition)` - nothing stored for the session
    pub async fn execute(&self, session_id: &SessionId) -> Result<Profile, ResolveProfileError> {
        let composition = self
            .compositions
            .load(session_id)
            .await?
            .ok_or_else(|| ResolveProfileError::NoComposition(session_id.clone()))?;

        Ok(self.resolve_composition(&composition).await)
    }

    /// Resolve an already-loaded composition.
    pub async fn resolve_composition(&self, composition: &SessionComposition) -> Profile {
        let loaded = self.load_bases(composition).await;

        tracing::debug!(
            session_id = %composition.session_id(),
            requested = composition.bases().len(),
            loaded = loaded.len(),
            "Resolving session profile"
        );
        composition.resolve(&loaded)
    }

    async fn load_bases(&self, composition: &SessionComposition) -> Vec<LoadedBase> {
        let first_only = match composition.composition_type() {
            CompositionType::Custom => return Vec::new(),
            CompositionType::Single | CompositionType::Unknown => true,
            CompositionType::FranchiseLink | CompositionType::CrossIpBlend => false,
        };

        let mut loaded = Vec::with_capacity(composition.bases().len());
        for reference in composition.bases() {
            match self.profiles.get(&reference.profile_id).await {
                Ok(Some(profile)) => {
                    loaded.push(LoadedBase::new(reference.clone(), profile));
                    if first_only {
                        break;
                    }
                }
                Ok(None) => {
                    tracing::warn!(
                        session_id = %composition.session_id(),
                        profile_id = %reference.profile_id,
                        "Base profile not found, skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %composition.session_id(),
                        profile_id = %reference.profile_id,
                        error = %e,
                        "Failed to load base profile, skipping"
                    );
                }
            }
        }
        loaded
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveProfileError {
    #[error("Session has no composition: {0}")]
    NoComposition(SessionId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
