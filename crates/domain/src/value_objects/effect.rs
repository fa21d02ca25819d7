//! Declarative effects produced by content and item handlers.
//!
//! Handlers never touch state; they return a list of `Effect` values and the
//! `EffectApplier` consumes them in a fixed category order.

use serde::{Deserialize, Serialize};

use super::choice::PendingChoice;
use super::dice::{GroupSplit, MAX_DICE, MAX_FACE, MIN_FACE};
use crate::error::DomainError;
use crate::ids::{AchievementId, ColumnId, ItemId, PlayerId};

/// How a trap immunity is paid for when it absorbs a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "cost", rename_all = "snake_case")]
pub enum TrapImmunity {
    /// Absorbs the trap for a score cost.
    Cost(u32),
    /// Absorbs the trap in exchange for a drawing check-in.
    Drawing,
    /// Absorbs the trap outright.
    Free,
}

/// Who a cross-player effect lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectTarget {
    /// The acting player's contract partner.
    Partner,
    Player { id: PlayerId },
    /// Every player holding a temporary marker on that cell.
    MarkersAt { column: ColumnId, position: u8 },
    /// A random half of the other players.
    RandomHalf,
    /// Every other player.
    Opponents,
}

/// Per-player tallies that unlock achievements at a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    TrapsTriggered,
    ItemsCollected,
}

impl CounterKind {
    pub fn key(&self) -> &'static str {
        match self {
            CounterKind::TrapsTriggered => "traps_triggered",
            CounterKind::ItemsCollected => "items_collected",
        }
    }

    /// Tally that grants the linked achievement.
    pub fn threshold(&self) -> (u32, AchievementId) {
        match self {
            CounterKind::TrapsTriggered => (3, AchievementId::bad_luck()),
            CounterKind::ItemsCollected => (5, AchievementId::collector()),
        }
    }
}

/// Application order. Lower categories run first within one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectCategory {
    Immunity = 1,
    Score = 2,
    Position = 3,
    RoundControl = 4,
    DiceModifier = 5,
    SideEffect = 6,
    Choice = 7,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    // 1. immunities and consumption checks
    GrantTrapImmunity { immunity: TrapImmunity },
    /// Spend an armed trap immunity (and its cost) instead of the trap.
    UseTrapImmunity,
    RetryOnFail,
    FreeRolls { count: u32 },

    // 2. score
    ScoreDelta { amount: i64 },

    // 3. position
    /// Move the temporary marker; negative retreats, positive advances.
    PositionDelta { column: ColumnId, delta: i32 },
    PermanentDelta { column: ColumnId, delta: u8 },
    ClearColumnProgress { column: ColumnId },
    TeleportTo { from: ColumnId, to: ColumnId },
    DirectTop { column: ColumnId },
    /// Convert current temporary markers to permanent and keep playing.
    CommitTemporary,

    // 4. round control
    SkipRounds { count: u32 },
    ForceRounds { count: u32 },
    ForceEndRound { until_check_in: bool },
    LockoutFor { minutes: u32 },
    ColumnFreeze { column: ColumnId },
    SweetTalkBlock { source: PlayerId },
    ClearLastRoll,
    /// Replace the faces of the current roll (same split).
    ReplaceLastRoll { faces: Vec<u8> },

    // 5. dice modifiers for the next roll
    FixNextRoll { faces: Vec<u8> },
    PartialFixRoll { faces: Vec<u8> },
    AllowReroll { face: u8 },
    AllDiceModifier { delta: i8 },
    NextDiceCount { split: GroupSplit },
    ExtraDieCheck,
    OddEvenCheck,
    MathCheck,

    // 6. inventory, achievements, shop, other players
    InventoryDelta { item: ItemId, quantity: i32 },
    Achievement { id: AchievementId },
    CountEvent { counter: CounterKind },
    UnlockShopItem { item: ItemId },
    CostReduction { amount: u32 },
    HalfPriceNextPurchase,
    ForPlayer {
        target: EffectTarget,
        effects: Vec<Effect>,
    },

    // 7. interactive choice
    RequireChoice { choice: PendingChoice },
}

impl Effect {
    pub fn category(&self) -> EffectCategory {
        match self {
            Effect::GrantTrapImmunity { .. }
            | Effect::UseTrapImmunity
            | Effect::RetryOnFail
            | Effect::FreeRolls { .. } => EffectCategory::Immunity,
            Effect::ScoreDelta { .. } => EffectCategory::Score,
            Effect::PositionDelta { .. }
            | Effect::PermanentDelta { .. }
            | Effect::ClearColumnProgress { .. }
            | Effect::TeleportTo { .. }
            | Effect::DirectTop { .. }
            | Effect::CommitTemporary => EffectCategory::Position,
            Effect::SkipRounds { .. }
            | Effect::ForceRounds { .. }
            | Effect::ForceEndRound { .. }
            | Effect::LockoutFor { .. }
            | Effect::ColumnFreeze { .. }
            | Effect::SweetTalkBlock { .. }
            | Effect::ClearLastRoll
            | Effect::ReplaceLastRoll { .. } => EffectCategory::RoundControl,
            Effect::FixNextRoll { .. }
            | Effect::PartialFixRoll { .. }
            | Effect::AllowReroll { .. }
            | Effect::AllDiceModifier { .. }
            | Effect::NextDiceCount { .. }
            | Effect::ExtraDieCheck
            | Effect::OddEvenCheck
            | Effect::MathCheck => EffectCategory::DiceModifier,
            Effect::InventoryDelta { .. }
            | Effect::Achievement { .. }
            | Effect::CountEvent { .. }
            | Effect::UnlockShopItem { .. }
            | Effect::CostReduction { .. }
            | Effect::HalfPriceNextPurchase
            | Effect::ForPlayer { .. } => EffectCategory::SideEffect,
            Effect::RequireChoice { .. } => EffectCategory::Choice,
        }
    }

    /// Shape checks that do not depend on game state.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Effect::FixNextRoll { faces } | Effect::ReplaceLastRoll { faces } => {
                GroupSplit::halves(faces.len()).map_err(|_| {
                    DomainError::validation(format!(
                        "a whole roll must hold 2 to {MAX_DICE} dice"
                    ))
                })?;
                validate_faces(faces)
            }
            Effect::PartialFixRoll { faces } => {
                if faces.is_empty() || faces.len() > MAX_DICE {
                    return Err(DomainError::validation(format!(
                        "fixed faces must hold 1 to {MAX_DICE} dice"
                    )));
                }
                validate_faces(faces)
            }
            Effect::AllowReroll { face } => validate_faces(std::slice::from_ref(face)),
            Effect::PositionDelta { delta: 0, .. } => {
                Err(DomainError::validation("position delta cannot be zero"))
            }
            Effect::PermanentDelta { delta: 0, .. } => {
                Err(DomainError::validation("permanent delta cannot be zero"))
            }
            Effect::TeleportTo { from, to } if from == to => Err(DomainError::validation(
                "teleport source and target are the same column",
            )),
            Effect::RequireChoice { choice } => match choice.spec() {
                super::choice::ChoiceSpec::Options(options) if options.is_empty() => Err(
                    DomainError::validation("a choice needs at least one option"),
                ),
                _ => Ok(()),
            },
            Effect::ForPlayer { effects, .. } => {
                if effects
                    .iter()
                    .any(|effect| matches!(effect, Effect::ForPlayer { .. }))
                {
                    return Err(DomainError::validation(
                        "cross-player effects cannot be nested",
                    ));
                }
                effects.iter().try_for_each(Effect::validate)
            }
            _ => Ok(()),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::GrantTrapImmunity { .. } => "grant_trap_immunity",
            Effect::UseTrapImmunity => "use_trap_immunity",
            Effect::RetryOnFail => "retry_on_fail",
            Effect::FreeRolls { .. } => "free_rolls",
            Effect::ScoreDelta { .. } => "score_delta",
            Effect::PositionDelta { .. } => "position_delta",
            Effect::PermanentDelta { .. } => "permanent_delta",
            Effect::ClearColumnProgress { .. } => "clear_column_progress",
            Effect::TeleportTo { .. } => "teleport_to",
            Effect::DirectTop { .. } => "direct_top",
            Effect::CommitTemporary => "commit_temporary",
            Effect::SkipRounds { .. } => "skip_rounds",
            Effect::ForceRounds { .. } => "force_rounds",
            Effect::ForceEndRound { .. } => "force_end_round",
            Effect::LockoutFor { .. } => "lockout_for",
            Effect::ColumnFreeze { .. } => "column_freeze",
            Effect::SweetTalkBlock { .. } => "sweet_talk_block",
            Effect::ClearLastRoll => "clear_last_roll",
            Effect::ReplaceLastRoll { .. } => "replace_last_roll",
            Effect::FixNextRoll { .. } => "fix_next_roll",
            Effect::PartialFixRoll { .. } => "partial_fix_roll",
            Effect::AllowReroll { .. } => "allow_reroll",
            Effect::AllDiceModifier { .. } => "all_dice_modifier",
            Effect::NextDiceCount { .. } => "next_dice_count",
            Effect::ExtraDieCheck => "extra_die_check",
            Effect::OddEvenCheck => "odd_even_check",
            Effect::MathCheck => "math_check",
            Effect::InventoryDelta { .. } => "inventory_delta",
            Effect::Achievement { .. } => "achievement",
            Effect::CountEvent { .. } => "count_event",
            Effect::UnlockShopItem { .. } => "unlock_shop_item",
            Effect::CostReduction { .. } => "cost_reduction",
            Effect::HalfPriceNextPurchase => "half_price_next_purchase",
            Effect::ForPlayer { .. } => "for_player",
            Effect::RequireChoice { .. } => "require_choice",
        }
    }
}

fn validate_faces(faces: &[u8]) -> Result<(), DomainError> {
    match faces
        .iter()
        .find(|face| !(MIN_FACE..=MAX_FACE).contains(*face))
    {
        Some(face) => Err(DomainError::validation(format!(
            "die face {face} is outside {MIN_FACE}-{MAX_FACE}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(raw: u8) -> ColumnId {
        ColumnId::new(raw).expect("valid column")
    }

    #[test]
    fn categories_follow_application_order() {
        assert!(Effect::RetryOnFail.category() < Effect::ScoreDelta { amount: 1 }.category());
        assert!(
            Effect::ScoreDelta { amount: 1 }.category()
                < Effect::PositionDelta {
                    column: column(7),
                    delta: -1
                }
                .category()
        );
        assert!(Effect::SkipRounds { count: 1 }.category() < Effect::MathCheck.category());
        assert!(
            Effect::MathCheck.category()
                < Effect::Achievement {
                    id: AchievementId::all_ones()
                }
                .category()
        );
    }

    #[test]
    fn fixed_faces_are_validated() {
        assert!(Effect::FixNextRoll {
            faces: vec![4, 5, 5, 5, 6, 6]
        }
        .validate()
        .is_ok());
        assert!(Effect::FixNextRoll { faces: vec![0, 7] }.validate().is_err());
        assert!(Effect::FixNextRoll { faces: vec![] }.validate().is_err());
        assert!(Effect::AllowReroll { face: 9 }.validate().is_err());
    }

    #[test]
    fn nested_cross_player_effects_are_rejected() {
        let nested = Effect::ForPlayer {
            target: EffectTarget::Partner,
            effects: vec![Effect::ForPlayer {
                target: EffectTarget::Opponents,
                effects: vec![],
            }],
        };
        assert!(nested.validate().is_err());
    }

    #[test]
    fn serializes_with_tag() {
        let json = serde_json::to_value(Effect::SkipRounds { count: 2 }).expect("serializable");
        assert_eq!(json["effect"], "skip_rounds");
        assert_eq!(json["count"], 2);
    }
}
