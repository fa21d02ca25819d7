//! Can't Stop Engine library.
//!
//! Everything around the pure game rules in `cantstop-domain`.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping domain operations
//! - `use_cases/` - Player story orchestration across entities
//! - `infrastructure/` - Ports plus the in-memory, catalog, clock and settings adapters
//! - `runner` - JSON-lines command loop
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod runner;
pub mod use_cases;

/// Test fixtures module for unit tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end flows over the in-memory adapters.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
