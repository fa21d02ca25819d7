//! Command intents
//!
//! Parsing free chat text into an intent is the transport's job; the engine
//! receives these already structured.

use serde::{Deserialize, Serialize};

/// One command from one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Chat-platform user id.
    pub player_id: String,
    /// Display name, used when the player is seen for the first time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub command: CommandIntent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandIntent {
    Register {
        nickname: String,
    },
    ChooseFaction {
        faction: String,
    },
    LinkPartner {
        partner: String,
    },
    StartRound,
    Roll {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u8>,
    },
    RecordMove {
        values: Vec<u8>,
    },
    EndRoundActive,
    EndRoundPassive,
    CheckIn,
    ResolveChoice {
        answer: String,
    },
    BuyItem {
        name: String,
    },
    UseItem {
        name: String,
        #[serde(default)]
        args: ItemArgs,
    },
    ClaimReward {
        kind: RewardKind,
        #[serde(default = "one")]
        count: u32,
        #[serde(default = "one")]
        multiplier: u32,
    },
    Query {
        query: QueryKind,
    },
    /// Unknown command type for forward compatibility
    #[serde(other)]
    Unknown,
}

fn one() -> u32 {
    1
}

impl CommandIntent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CommandIntent::Register { .. } => "register",
            CommandIntent::ChooseFaction { .. } => "choose_faction",
            CommandIntent::LinkPartner { .. } => "link_partner",
            CommandIntent::StartRound => "start_round",
            CommandIntent::Roll { .. } => "roll",
            CommandIntent::RecordMove { .. } => "record_move",
            CommandIntent::EndRoundActive => "end_round_active",
            CommandIntent::EndRoundPassive => "end_round_passive",
            CommandIntent::CheckIn => "check_in",
            CommandIntent::ResolveChoice { .. } => "resolve_choice",
            CommandIntent::BuyItem { .. } => "buy_item",
            CommandIntent::UseItem { .. } => "use_item",
            CommandIntent::ClaimReward { .. } => "claim_reward",
            CommandIntent::Query { .. } => "query",
            CommandIntent::Unknown => "unknown",
        }
    }
}

/// Extra arguments some items need. Unused fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemArgs {
    /// Another player's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u8>,
    /// Second column, for items that move a marker between columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_column: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
}

/// Artwork submitted for a check-in reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Sketch,
    SmallDrawing,
    RoughLarge,
    FineLarge,
    Outstanding,
}

impl RewardKind {
    /// Base points for one piece.
    pub fn base_points(&self) -> u32 {
        match self {
            RewardKind::Sketch => 20,
            RewardKind::SmallDrawing => 80,
            RewardKind::RoughLarge => 100,
            RewardKind::FineLarge => 150,
            RewardKind::Outstanding => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Progress,
    Inventory,
    Achievements,
    Shop,
    Board,
}
