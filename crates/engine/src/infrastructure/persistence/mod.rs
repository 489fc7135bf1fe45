//! Repository adapters.
//!
//! - `memory` - DashMap-backed, for tests and seeding
//! - `json_files` - one JSON document per profile or composition on disk

mod json_files;
mod memory;

pub use json_files::{JsonCompositionRepo, JsonProfileRepo};
pub use memory::{InMemoryCompositionRepo, InMemoryProfileRepo};
