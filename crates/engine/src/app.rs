//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    persistence::{JsonCompositionRepo, JsonProfileRepo},
    ports::{ClockPort, CompositionRepo, ProfileRepo},
};
use crate::use_cases::CompositionUseCases;

/// Main application state.
///
/// Holds the repositories and the use cases built on top of them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: CompositionUseCases,
}

/// Container for repository ports.
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepo>,
    pub compositions: Arc<dyn CompositionRepo>,
}

impl App {
    /// Wire use cases over arbitrary repositories.
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        compositions: Arc<dyn CompositionRepo>,
        clock: Arc<dyn ClockPort>,
        default_tier: impl Into<String>,
    ) -> Self {
        let use_cases = CompositionUseCases::new(
            profiles.clone(),
            compositions.clone(),
            clock,
            default_tier,
        );
        Self {
            repositories: Repositories {
                profiles,
                compositions,
            },
            use_cases,
        }
    }

    /// Wire the JSON-file repositories named by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        tracing::info!(
            profiles_dir = %config.profiles_dir.display(),
            compositions_dir = %config.compositions_dir.display(),
            "Using JSON file repositories"
        );
        Self::new(
            Arc::new(JsonProfileRepo::new(&config.profiles_dir)),
            Arc::new(JsonCompositionRepo::new(&config.compositions_dir)),
            Arc::new(SystemClock::new()),
            config.default_tier.clone(),
        )
    }
}
