//! Session composition lifecycle.
//!
//! A composition is created once per session, re-saved when the player
//! changes its references or overlay, and deleted with the session.

use std::sync::Arc;

use canonbldr_domain::{
    CompositionType, DomainError, ProfileReference, SessionComposition, SessionId, SessionLayer,
};

use crate::infrastructure::ports::{ClockPort, CompositionRepo, RepoError};

pub struct ComposeSession {
    compositions: Arc<dyn CompositionRepo>,
    clock: Arc<dyn ClockPort>,
}

impl ComposeSession {
    pub fn new(compositions: Arc<dyn CompositionRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            compositions,
            clock,
        }
    }

    /// Create and persist the session's composition.
    ///
    /// # Returns
    /// * `Ok(SessionComposition)` - the stored composition
    /// * `Err(ComposeSessionError::AlreadyComposed)` - the session already has one
    /// * `Err(ComposeSessionError::Invalid)` - the composition failed validation
    pub async fn create(
        &self,
        session_id: SessionId,
        composition_type: CompositionType,
        bases: Vec<ProfileReference>,
        layer: SessionLayer,
    ) -> Result<SessionComposition, ComposeSessionError> {
        if self.compositions.load(&session_id).await?.is_some() {
            return Err(ComposeSessionError::AlreadyComposed(session_id));
        }

        let composition =
            SessionComposition::new(session_id, composition_type, bases, self.clock.now())
                .with_layer(layer);
        composition.validate()?;
        self.compositions.save(&composition).await?;

        tracing::info!(
            session_id = %composition.session_id(),
            composition_type = %composition.composition_type(),
            base_count = composition.bases().len(),
            "Session composition created"
        );
        Ok(composition)
    }

    /// Replace the session overlay. `created_at` is kept.
    pub async fn update_layer(
        &self,
        session_id: &SessionId,
        layer: SessionLayer,
    ) -> Result<SessionComposition, ComposeSessionError> {
        let mut composition = self.load_existing(session_id).await?;
        composition.set_layer(layer);
        composition.validate()?;
        self.compositions.save(&composition).await?;

        tracing::info!(session_id = %session_id, "Session layer updated");
        Ok(composition)
    }

    /// Replace the base references and composition type. `created_at` is kept.
    pub async fn replace_bases(
        &self,
        session_id: &SessionId,
        composition_type: CompositionType,
        bases: Vec<ProfileReference>,
    ) -> Result<SessionComposition, ComposeSessionError> {
        let mut composition = self.load_existing(session_id).await?;
        composition.replace_bases(composition_type, bases);
        composition.validate()?;
        self.compositions.save(&composition).await?;

        tracing::info!(
            session_id = %session_id,
            composition_type = %composition_type,
            base_count = composition.bases().len(),
            "Session bases replaced"
        );
        Ok(composition)
    }

    /// Delete the session's composition. Discarding twice is not an error.
    pub async fn discard(&self, session_id: &SessionId) -> Result<(), ComposeSessionError> {
        self.compositions.delete(session_id).await?;
        tracing::info!(session_id = %session_id, "Session composition discarded");
        Ok(())
    }

    async fn load_existing(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionComposition, ComposeSessionError> {
        self.compositions
            .load(session_id)
            .await?
            .ok_or_else(|| ComposeSessionError::NotFound(session_id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeSessionError {
    #[error("Session has no composition: {0}")]
    NotFound(SessionId),
    #[error("Session already has a composition: {0}")]
    AlreadyComposed(SessionId),
    #[error("Invalid composition: {0}")]
    Invalid(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
