//! Port traits for infrastructure boundaries.
//!
//! Use cases only see these traits: game storage, the content catalog, and
//! the clock and dice. Adapters live beside this module.

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    AchievementRepo, BoardRepo, CascadeSave, InventoryRepo, PlayerRepo, SaleOutcome, ShopRepo,
};

// =============================================================================
// Errors
// =============================================================================
pub use error::{CatalogError, RepoError};

// =============================================================================
// Content Catalog Port
// =============================================================================
pub use external::{
    ChoiceContext, ContentCatalog, ContentOutcome, ItemUseArgs, ItemUseContext, PlayerSnapshot,
    TriggerContext,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockAchievementRepo, MockBoardRepo, MockInventoryRepo, MockPlayerRepo, MockShopRepo,
};

#[cfg(test)]
pub use external::MockContentCatalog;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};
