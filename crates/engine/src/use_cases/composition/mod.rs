//! Session composition use cases.

mod classify;
mod compose;
mod framing;
mod resolve;

use std::sync::Arc;

pub use classify::{BaseAxes, ClassifyBase, ClassifyBaseError};
pub use compose::{ComposeSession, ComposeSessionError};
pub use framing::TurnFraming;
pub use resolve::{ResolveProfile, ResolveProfileError};

use crate::infrastructure::ports::{ClockPort, CompositionRepo, ProfileRepo};

/// Container for composition use cases.
pub struct CompositionUseCases {
    pub compose: Arc<ComposeSession>,
    pub resolve: Arc<ResolveProfile>,
    pub framing: Arc<TurnFraming>,
    pub classify: Arc<ClassifyBase>,
}

impl CompositionUseCases {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        compositions: Arc<dyn CompositionRepo>,
        clock: Arc<dyn ClockPort>,
        default_tier: impl Into<String>,
    ) -> Self {
        let resolve = Arc::new(ResolveProfile::new(profiles.clone(), compositions.clone()));
        Self {
            compose: Arc::new(ComposeSession::new(compositions, clock)),
            framing: Arc::new(TurnFraming::new(resolve.clone(), default_tier)),
            classify: Arc::new(ClassifyBase::new(profiles)),
            resolve,
        }
    }
}
