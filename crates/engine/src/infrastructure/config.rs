//! Engine configuration from the environment.

use std::path::{Path, PathBuf};

use canonbldr_domain::DEFAULT_TIER_TAG;

pub const PROFILES_DIR_VAR: &str = "CANONBLDR_PROFILES_DIR";
pub const COMPOSITIONS_DIR_VAR: &str = "CANONBLDR_COMPOSITIONS_DIR";
pub const DEFAULT_TIER_VAR: &str = "CANONBLDR_DEFAULT_TIER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub profiles_dir: PathBuf,
    pub compositions_dir: PathBuf,
    /// Baseline tier when neither the turn nor the profile supplies one.
    pub default_tier: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from("./profiles"),
            compositions_dir: PathBuf::from("./compositions"),
            default_tier: DEFAULT_TIER_TAG.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    ///
    /// Call [`load_dotenv`] first to pick up `.env.local` / `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            profiles_dir: read(PROFILES_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.profiles_dir),
            compositions_dir: read(COMPOSITIONS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.compositions_dir),
            default_tier: read(DEFAULT_TIER_VAR).unwrap_or(defaults.default_tier),
        }
    }

    pub fn with_profiles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profiles_dir = dir.into();
        self
    }

    pub fn with_compositions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.compositions_dir = dir.into();
        self
    }
}

/// Load `.env.local` then `.env` from `dir`, if present.
///
/// Variables already set in the process environment are never overwritten,
/// so `.env.local` wins over `.env`.
pub fn load_dotenv(dir: &Path) {
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
        assert_eq!(EngineConfig::default().default_tier, "T8");
    }

    #[test]
    fn variables_override_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[
            (PROFILES_DIR_VAR, "/data/profiles"),
            (COMPOSITIONS_DIR_VAR, "/data/sessions"),
            (DEFAULT_TIER_VAR, "T6"),
        ]));
        assert_eq!(config.profiles_dir, PathBuf::from("/data/profiles"));
        assert_eq!(config.compositions_dir, PathBuf::from("/data/sessions"));
        assert_eq!(config.default_tier, "T6");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = EngineConfig::from_lookup(lookup(&[(DEFAULT_TIER_VAR, "   ")]));
        assert_eq!(config.default_tier, "T8");
    }

    #[test]
    fn dotenv_file_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(".env"),
            "CANONBLDR_TEST_ONLY_DOTENV_VAR=loaded\n",
        )
        .expect("write");

        load_dotenv(dir.path());
        assert_eq!(
            std::env::var("CANONBLDR_TEST_ONLY_DOTENV_VAR").as_deref(),
            Ok("loaded")
        );
    }
}
