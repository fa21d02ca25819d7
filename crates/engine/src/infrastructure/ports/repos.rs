//! Repository port traits for game storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cantstop_domain::{
    AchievementBook, AchievementId, CellPosition, ColumnId, Inventory, ItemId, Player,
    PlayerGameState, PlayerId, ShopListing,
};

use super::error::RepoError;

// =============================================================================
// Players
// =============================================================================

/// Outcome of `PlayerRepo::save_with_cascade`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeSave {
    pub version: u64,
    /// Players knocked off each topped column, columns in request order.
    pub knocked: Vec<(ColumnId, Vec<PlayerId>)>,
}

/// Player profiles and their per-player game state.
///
/// The profile and the game state are written together; `save` is rejected
/// with `RepoError::Conflict` when the stored state version differs from
/// `state.version`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, RepoError>;

    /// Store `player` unless the id is taken. Returns the stored record and
    /// whether it was created by this call.
    async fn insert_if_absent(&self, player: &Player) -> Result<(Player, bool), RepoError>;

    async fn list(&self) -> Result<Vec<Player>, RepoError>;

    /// The saved state, or a fresh one at version 0.
    async fn load_state(&self, id: &PlayerId) -> Result<PlayerGameState, RepoError>;

    /// Atomic, version-checked write. Returns the new version.
    async fn save(&self, player: &Player, state: &PlayerGameState) -> Result<u64, RepoError>;

    /// `save` and the top-out cascade as one step. Once the version check
    /// passes, every other player's temporary marker in the `topped` columns
    /// is removed and their state versions bumped. On conflict nothing is
    /// written.
    async fn save_with_cascade(
        &self,
        player: &Player,
        state: &PlayerGameState,
        topped: &[ColumnId],
    ) -> Result<CascadeSave, RepoError>;

    /// Players whose temporary marker sits on the cell.
    async fn players_with_marker_at(&self, at: CellPosition) -> Result<Vec<PlayerId>, RepoError>;
}

// =============================================================================
// Inventory and achievements
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn get(&self, player: &PlayerId) -> Result<Inventory, RepoError>;

    /// Add or remove copies. Removing more than held is a constraint
    /// violation and changes nothing. Returns the new quantity.
    async fn apply_delta(
        &self,
        player: &PlayerId,
        item: ItemId,
        delta: i32,
    ) -> Result<u32, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementRepo: Send + Sync {
    async fn list(&self, player: &PlayerId) -> Result<AchievementBook, RepoError>;

    /// Insert if absent. Returns true when newly earned.
    async fn grant(
        &self,
        player: &PlayerId,
        id: &AchievementId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Board-wide records
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepo: Send + Sync {
    /// True for exactly one caller per cell while the claim stands.
    async fn record_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<bool, RepoError>;

    /// Drop a claim on a cell held by `player`, for a move that was not
    /// saved. Claims held by anyone else are left alone.
    async fn release_first_trigger(
        &self,
        at: CellPosition,
        player: &PlayerId,
    ) -> Result<(), RepoError>;

    /// True for exactly one caller per column while the claim stands.
    async fn record_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<bool, RepoError>;

    /// Drop a first-clear claim held by `player` whose top-out was not saved.
    async fn release_first_clear(
        &self,
        column: ColumnId,
        player: &PlayerId,
    ) -> Result<(), RepoError>;

    /// Append to the win ranking. Calling again for a ranked player returns
    /// the rank already held.
    async fn record_win(&self, player: &PlayerId) -> Result<u32, RepoError>;

    async fn first_clears(&self) -> Result<Vec<(ColumnId, PlayerId)>, RepoError>;

    async fn ranking(&self) -> Result<Vec<PlayerId>, RepoError>;
}

// =============================================================================
// Shop
// =============================================================================

/// Result of an attempt to take one copy out of a listing's global stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    Recorded { remaining: Option<u32> },
    SoldOut,
    NotListed,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<ShopListing>, RepoError>;

    async fn get(&self, item: ItemId) -> Result<Option<ShopListing>, RepoError>;

    /// Lookup ignoring case, spacing and punctuation.
    async fn get_by_name(&self, name: &str) -> Result<Option<ShopListing>, RepoError>;

    /// Returns true when the listing was locked before.
    async fn unlock(&self, item: ItemId) -> Result<bool, RepoError>;

    /// Atomically check the global limit and count one sale.
    async fn try_record_sale(&self, item: ItemId) -> Result<SaleOutcome, RepoError>;
}
