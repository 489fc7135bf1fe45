//! JSON file repositories.
//!
//! Each entity is one pretty-printed `<id>.json` document in its own
//! directory. Writes go to a temporary sibling first and are renamed into
//! place, so a reader never sees a half-written document.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use canonbldr_domain::{Profile, ProfileId, SessionComposition, SessionId};

use crate::infrastructure::ports::{CompositionRepo, ProfileRepo, RepoError};

const EXTENSION: &str = "json";

/// A directory of `<id>.json` documents.
#[derive(Debug, Clone)]
struct JsonDir {
    root: PathBuf,
    entity_type: &'static str,
}

impl JsonDir {
    fn new(root: impl Into<PathBuf>, entity_type: &'static str) -> Self {
        Self {
            root: root.into(),
            entity_type,
        }
    }

    /// Path for `id`, refusing ids that would escape the directory.
    fn path_for(&self, id: &str) -> Result<PathBuf, RepoError> {
        let trimmed = id.trim();
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed == "."
            || trimmed == ".."
        {
            return Err(RepoError::constraint(format!(
                "{} id is not a valid file name: {:?}",
                self.entity_type, id
            )));
        }
        Ok(self.root.join(format!("{}.{}", trimmed, EXTENSION)))
    }

    async fn read<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, RepoError> {
        let path = self.path_for(id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::database("json.read", e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RepoError::serialization(format!("{}: {}", path.display(), e)))
    }

    async fn write<T: Serialize>(&self, id: &str, value: &T) -> Result<(), RepoError> {
        let path = self.path_for(id)?;
        let json = serde_json::to_vec_pretty(value).map_err(RepoError::serialization)?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepoError::database("json.create_dir", e))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json)
            .await
            .map_err(|e| RepoError::database("json.write", e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepoError::database("json.rename", e))?;

        tracing::debug!(path = %path.display(), "Wrote {}", self.entity_type);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), RepoError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepoError::database("json.remove", e)),
        }
    }

    /// File stems of every `.json` document, sorted. A missing directory is empty.
    async fn ids(&self) -> Result<Vec<String>, RepoError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::database("json.read_dir", e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::database("json.read_dir", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Profile library stored as `<profile_id>.json` files.
#[derive(Debug, Clone)]
pub struct JsonProfileRepo {
    dir: JsonDir,
}

impl JsonProfileRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            dir: JsonDir::new(root, "Profile"),
        }
    }

    /// Write a profile into the library. Not part of the read-only port.
    pub async fn put(&self, profile: &Profile) -> Result<(), RepoError> {
        self.dir.write(profile.id.as_str(), profile).await
    }
}

#[async_trait]
impl ProfileRepo for JsonProfileRepo {
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, RepoError> {
        self.dir.read(id.as_str()).await
    }

    async fn list_ids(&self) -> Result<Vec<ProfileId>, RepoError> {
        Ok(self.dir.ids().await?.into_iter().map(ProfileId::new).collect())
    }
}

/// Compositions stored as `<session_id>.json` files.
#[derive(Debug, Clone)]
pub struct JsonCompositionRepo {
    dir: JsonDir,
}

impl JsonCompositionRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            dir: JsonDir::new(root, "SessionComposition"),
        }
    }
}

#[async_trait]
impl CompositionRepo for JsonCompositionRepo {
    async fn load(&self, session_id: &SessionId) -> Result<Option<SessionComposition>, RepoError> {
        self.dir.read(session_id.as_str()).await
    }

    async fn save(&self, composition: &SessionComposition) -> Result<(), RepoError> {
        self.dir
            .write(composition.session_id().as_str(), composition)
            .await
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepoError> {
        self.dir.remove(session_id.as_str()).await
    }
}
