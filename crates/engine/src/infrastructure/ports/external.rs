//! Content catalog port: what happens on a cell, on item use and on answers.
//!
//! The catalog only decides. It never touches storage; everything it wants
//! done comes back as effects for the engine to apply.

use cantstop_domain::{
    CellPosition, ColumnId, ContentRef, DiceRoll, Effect, Faction, Inventory, InventoryEntry,
    ItemId, PendingChoice, Player, PlayerGameState, PlayerId, ResolvedAnswer, TrapImmunity,
};

use super::error::CatalogError;

// =============================================================================
// Context
// =============================================================================

/// Read-only view of the acting player handed to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub nickname: String,
    pub faction: Option<Faction>,
    pub current_score: i64,
    pub partner: Option<PlayerId>,
    pub trap_immunity: Option<TrapImmunity>,
    pub round_active: bool,
    pub last_roll: Option<DiceRoll>,
    /// (column, position) of every temporary marker.
    pub temporary: Vec<(ColumnId, u8)>,
    pub topped: Vec<ColumnId>,
    pub inventory: Vec<InventoryEntry>,
    pub last_used_item: Option<ItemId>,
}

impl PlayerSnapshot {
    pub fn capture(player: &Player, game: &PlayerGameState, inventory: &Inventory) -> Self {
        Self {
            id: player.id().clone(),
            nickname: player.nickname().to_string(),
            faction: player.faction(),
            current_score: player.current_score(),
            partner: player.partner().cloned(),
            trap_immunity: game.round.trap_immunity(),
            round_active: game.round.is_active(),
            last_roll: game.round.last_roll().cloned(),
            temporary: game.markers.temporary_markers().collect(),
            topped: game.markers.topped().iter().copied().collect(),
            inventory: inventory.entries().collect(),
            last_used_item: game.round.last_used_item(),
        }
    }

    pub fn temporary_in(&self, column: ColumnId) -> Option<u8> {
        self.temporary
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, position)| *position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    pub player: PlayerSnapshot,
    pub at: CellPosition,
    pub content: ContentRef,
    /// No one has set this cell off before.
    pub is_first: bool,
}

/// Optional arguments an item may need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUseArgs {
    pub target: Option<PlayerId>,
    pub column: Option<ColumnId>,
    pub to_column: Option<ColumnId>,
    pub position: Option<u8>,
    pub faces: Vec<u8>,
    pub choice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUseContext {
    pub player: PlayerSnapshot,
    pub item: ItemId,
    pub args: ItemUseArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceContext {
    pub player: PlayerSnapshot,
    pub choice: PendingChoice,
    pub answer: ResolvedAnswer,
}

// =============================================================================
// Outcome
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentOutcome {
    pub message: String,
    pub effects: Vec<Effect>,
    pub choice: Option<PendingChoice>,
    /// Leave the used item in the inventory.
    pub keep_item: bool,
}

impl ContentOutcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn with_choice(mut self, choice: PendingChoice) -> Self {
        self.choice = Some(choice);
        self
    }

    pub fn keeping_item(mut self) -> Self {
        self.keep_item = true;
        self
    }

    /// Message plus the effect batch, with the choice queued last.
    pub fn into_parts(self) -> (String, Vec<Effect>) {
        let mut effects = self.effects;
        if let Some(choice) = self.choice {
            effects.push(Effect::RequireChoice { choice });
        }
        (self.message, effects)
    }
}

// =============================================================================
// Catalog Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ContentCatalog: Send + Sync {
    /// A marker ended its move on a content cell.
    fn trigger(&self, ctx: &TriggerContext) -> Result<ContentOutcome, CatalogError>;

    fn use_item(&self, ctx: &ItemUseContext) -> Result<ContentOutcome, CatalogError>;

    /// Follow-up for an answered pending choice.
    fn resolve_choice(&self, ctx: &ChoiceContext) -> Result<ContentOutcome, CatalogError>;

    /// Item id for a display name, ignoring case and punctuation.
    fn find_item(&self, name: &str) -> Option<ItemId>;

    fn item_name(&self, item: ItemId) -> String;

    fn content_name(&self, content: ContentRef) -> String;
}
