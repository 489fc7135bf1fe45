//! In-memory repositories.

use async_trait::async_trait;
use dashmap::DashMap;

use canonbldr_domain::{Profile, ProfileId, SessionComposition, SessionId};

use crate::infrastructure::ports::{CompositionRepo, ProfileRepo, RepoError};

/// In-memory profile library
#[derive(Default)]
pub struct InMemoryProfileRepo {
    profiles: DashMap<ProfileId, Profile>,
}

impl InMemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `profile` under its own id, replacing any previous entry.
    pub fn insert(&self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }
}

impl FromIterator<Profile> for InMemoryProfileRepo {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let repo = Self::new();
        for profile in iter {
            repo.insert(profile);
        }
        repo
    }
}

#[async_trait]
impl ProfileRepo for InMemoryProfileRepo {
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, RepoError> {
        Ok(self.profiles.get(id).map(|p| p.clone()))
    }

    async fn list_ids(&self) -> Result<Vec<ProfileId>, RepoError> {
        let mut ids: Vec<ProfileId> = self.profiles.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}

/// In-memory composition store
#[derive(Default)]
pub struct InMemoryCompositionRepo {
    compositions: DashMap<SessionId, SessionComposition>,
}

impl InMemoryCompositionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompositionRepo for InMemoryCompositionRepo {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionComposition>, RepoError> {
        Ok(self.compositions.get(session_id).map(|c| c.clone()))
    }

    async fn save(&self, composition: &SessionComposition) -> Result<(), RepoError> {
        self.compositions
            .insert(composition.session_id().clone(), composition.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepoError> {
        self.compositions.remove(session_id);
        Ok(())
    }
}
