//! CanonBldr Engine library.
//!
//! Orchestrates session profile composition over the pure domain crate.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration (compose, resolve, frame, classify)
//! - `infrastructure/` - Ports, adapters, clock and configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
