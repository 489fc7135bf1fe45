//! Aggregate roots - domain objects that own their related data
//!
//! A `SessionComposition` owns its base references and session layer; the
//! profiles it resolves to are plain values owned by the caller.

pub mod session_composition;

pub use session_composition::{CompositionType, SessionComposition};
