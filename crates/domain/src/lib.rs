//! Can't Stop domain.
//!
//! Pure, synchronous game rules: the dice-combination resolver, per-player
//! marker tracking, the pending choice queue, the round state machine and the
//! effect applier. Nothing in this crate performs I/O or draws randomness;
//! dice are injected by the caller.

extern crate self as cantstop_domain;

pub mod entities;
pub mod error;
pub mod game;
pub mod ids;
pub mod value_objects;

pub use entities::{
    AchievementBook, Board, BoardColumn, ColumnProgress, ContentCell, EarnedAchievement,
    Inventory, InventoryEntry, PendingChoiceQueue, Player, PlayerGameState, PositionTracker,
    RetreatOutcome, RollRecord, RoundPhase, RoundState, ShopListing, SweetTalkBlock,
    TeleportOutcome, MAX_ROUND_COLUMNS,
};
pub use error::DomainError;
pub use game::{
    ActiveEnd, CellArrival, EffectApplier, EffectSummary, MachineState, MoveOutcome,
    PassiveEnd, RollOutcome, RollReport, RoundStateMachine, VoidReason,
};
pub use ids::{AchievementId, ColumnId, EncounterId, ItemId, PlayerId, RoundId, TrapId};
pub use value_objects::{
    normalize_answer, solve, ActiveModifiers, CellKind, CellPosition, ChoiceSpec, ContentRef,
    CounterKind, DiceRoll, Effect, EffectCategory, EffectTarget, Faction, GroupSplit, Modifier,
    ModifierKind, PendingChoice, ResolvedAnswer, RollModifiers, SumPair, TrapImmunity,
};
