//! Read-only views returned by queries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub column: u8,
    pub height: u8,
    /// 0 when no permanent marker is placed.
    pub permanent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary: Option<u8>,
    pub topped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    /// Board notation of the source, e.g. `E12`.
    pub source: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub freeform: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollView {
    pub faces: Vec<u8>,
    pub pairs: Vec<[u8; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub player_id: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    pub current_score: i64,
    pub total_score: i64,
    /// idle, active, awaiting_choice or locked
    pub state: String,
    pub columns: Vec<ColumnView>,
    pub round_columns: Vec<u8>,
    pub pending: Vec<ChoiceView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_roll: Option<RollView>,
    pub free_rolls: u32,
    pub skip_rounds: u32,
    pub forced_rounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockout_until: Option<String>,
    pub needs_check_in: bool,
    pub frozen_columns: Vec<u8>,
    pub failures: u32,
    pub has_won: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: u16,
    pub name: String,
    pub quantity: u32,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryView {
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementView {
    pub id: String,
    pub title: String,
    /// RFC 3339
    pub earned_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItemView {
    pub id: u16,
    pub name: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    pub owned: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopView {
    pub half_price: bool,
    pub items: Vec<ShopItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerView {
    pub player_id: String,
    pub position: u8,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumnView {
    pub column: u8,
    pub height: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_clear: Option<String>,
    pub markers: Vec<MarkerView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: Vec<BoardColumnView>,
    /// Winners in rank order.
    pub ranking: Vec<String>,
}
