//! In-memory storage adapters.
//!
//! Every repository port has an implementation here. State lives only as
//! long as the process, which is what the command runner and the tests
//! need. Each operation takes one lock (or one map shard), so the atomicity
//! each port promises holds across concurrent callers.

mod achievements;
mod board;
mod inventory;
mod players;
mod shop;

pub use achievements::InMemoryAchievementRepo;
pub use board::InMemoryBoardRepo;
pub use inventory::InMemoryInventoryRepo;
pub use players::InMemoryPlayerRepo;
pub use shop::InMemoryShopRepo;

use std::sync::Arc;

/// One of each in-memory repository, ready to hand to `App::new`.
pub struct InMemoryRepositories {
    pub players: Arc<InMemoryPlayerRepo>,
    pub inventory: Arc<InMemoryInventoryRepo>,
    pub achievements: Arc<InMemoryAchievementRepo>,
    pub board: Arc<InMemoryBoardRepo>,
    pub shop: Arc<InMemoryShopRepo>,
}

impl InMemoryRepositories {
    /// Empty stores with the given shop stock.
    pub fn new(listings: Vec<cantstop_domain::ShopListing>) -> Self {
        Self {
            players: Arc::new(InMemoryPlayerRepo::new()),
            inventory: Arc::new(InMemoryInventoryRepo::new()),
            achievements: Arc::new(InMemoryAchievementRepo::new()),
            board: Arc::new(InMemoryBoardRepo::new()),
            shop: Arc::new(InMemoryShopRepo::new(listings)),
        }
    }
}
