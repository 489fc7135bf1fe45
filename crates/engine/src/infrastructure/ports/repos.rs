//! Repository port traits.

use async_trait::async_trait;
use canonbldr_domain::{Profile, ProfileId, SessionComposition, SessionId};

use super::error::RepoError;

// =============================================================================
// Profile library
// =============================================================================

/// Read-only access to the library of base profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    /// `Ok(None)` when no profile is stored under `id`.
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, RepoError>;
    async fn list_ids(&self) -> Result<Vec<ProfileId>, RepoError>;
}

// =============================================================================
// Session compositions
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompositionRepo: Send + Sync {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionComposition>, RepoError>;
    /// Insert or replace the composition for its session.
    async fn save(&self, composition: &SessionComposition) -> Result<(), RepoError>;
    /// Deleting a session with no composition is not an error.
    async fn delete(&self, session_id: &SessionId) -> Result<(), RepoError>;
}
