//! Can't Stop Shared - types exchanged between the engine and a transport
//!
//! - Command intents and envelopes (what a chat message asks for)
//! - Replies with an error classification
//! - Read-only view DTOs returned by queries
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain types** - ids and enums travel as plain strings and numbers

pub mod commands;
pub mod responses;
pub mod views;

pub use commands::{CommandEnvelope, CommandIntent, ItemArgs, QueryKind, RewardKind};
pub use responses::{CommandReply, ErrorKind};
pub use views::{
    AchievementView, BoardColumnView, BoardView, ChoiceView, ColumnView, InventoryView,
    ItemView, MarkerView, ProgressView, RollView, ShopItemView, ShopView,
};
