//! Stateful game entities.

mod achievements;
mod board;
mod game_state;
mod inventory;
mod markers;
mod pending_choice;
mod player;
mod round_state;
mod shop;

pub use achievements::{AchievementBook, EarnedAchievement};
pub use board::{Board, BoardColumn, ContentCell};
pub use game_state::{PlayerGameState, WINNING_COLUMNS};
pub use inventory::{Inventory, InventoryEntry};
pub use markers::{
    ColumnProgress, PositionTracker, RetreatOutcome, TeleportOutcome, MAX_ROUND_COLUMNS,
};
pub use pending_choice::PendingChoiceQueue;
pub use player::Player;
pub use round_state::{RollRecord, RoundPhase, RoundState, SweetTalkBlock};
pub use shop::ShopListing;
