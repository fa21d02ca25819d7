//! Effect applier
//!
//! Consumes a batch of effects for one player. The batch is validated as a
//! whole, stable-sorted by category and applied to copies of the player and
//! their game state; the copies replace the originals only if every effect
//! went through. Effects that reach beyond this player's record (inventory,
//! achievements, shop, other players) are collected into the summary for
//! the caller to persist or route.

use chrono::{DateTime, Duration, Utc};

use crate::entities::{Board, Player, PlayerGameState, RoundPhase, SweetTalkBlock, TeleportOutcome};
use crate::error::DomainError;
use crate::ids::{AchievementId, ColumnId, ItemId};
use crate::value_objects::{DiceRoll, Effect, EffectTarget, GroupSplit, Modifier, TrapImmunity};

/// What a batch did, and what the caller still has to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectSummary {
    pub score_delta: i64,
    /// Temporary marker moves; `None` when the marker disappeared or could not move.
    pub moves: Vec<(ColumnId, Option<u8>)>,
    /// Columns topped by this batch. The caller runs the top-out cascade.
    pub newly_topped: Vec<ColumnId>,
    pub won: bool,
    pub round_ended: bool,
    pub immunity_used: Option<TrapImmunity>,
    pub inventory: Vec<(ItemId, i32)>,
    pub achievements: Vec<AchievementId>,
    pub unlocked_items: Vec<ItemId>,
    /// Cross-player effects, not yet applied.
    pub deferred: Vec<(EffectTarget, Vec<Effect>)>,
    pub choices_enqueued: usize,
    pub notes: Vec<String>,
}

impl EffectSummary {
    pub fn merge(&mut self, other: EffectSummary) {
        self.score_delta += other.score_delta;
        self.moves.extend(other.moves);
        self.newly_topped.extend(other.newly_topped);
        self.won |= other.won;
        self.round_ended |= other.round_ended;
        self.immunity_used = self.immunity_used.or(other.immunity_used);
        self.inventory.extend(other.inventory);
        self.achievements.extend(other.achievements);
        self.unlocked_items.extend(other.unlocked_items);
        self.deferred.extend(other.deferred);
        self.choices_enqueued += other.choices_enqueued;
        self.notes.extend(other.notes);
    }
}

pub struct EffectApplier<'a> {
    board: &'a Board,
    follow_up: bool,
}

impl<'a> EffectApplier<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            follow_up: false,
        }
    }

    /// Choices raised by this batch go to the front of the queue. Used while
    /// resolving a choice so its follow-up is answered next.
    pub fn as_follow_up(mut self) -> Self {
        self.follow_up = true;
        self
    }

    pub fn apply(
        &self,
        player: &mut Player,
        game: &mut PlayerGameState,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<EffectSummary, DomainError> {
        effects.iter().try_for_each(Effect::validate)?;

        let mut ordered = effects;
        ordered.sort_by_key(Effect::category);

        let mut next_player = player.clone();
        let mut next_game = game.clone();
        let mut summary = EffectSummary::default();
        let mut follow_ups = Vec::new();

        for effect in ordered {
            self.apply_one(
                &mut next_player,
                &mut next_game,
                effect,
                now,
                &mut summary,
                &mut follow_ups,
            )?;
        }

        for choice in follow_ups.into_iter().rev() {
            next_game.round.pending.push_front(choice);
        }
        if !summary.newly_topped.is_empty() {
            summary.won = next_game.claim_win();
        }

        *player = next_player;
        *game = next_game;
        Ok(summary)
    }

    fn apply_one(
        &self,
        player: &mut Player,
        game: &mut PlayerGameState,
        effect: Effect,
        now: DateTime<Utc>,
        summary: &mut EffectSummary,
        follow_ups: &mut Vec<crate::value_objects::PendingChoice>,
    ) -> Result<(), DomainError> {
        let round = &mut game.round;
        match effect {
            // 1. immunities and consumption
            Effect::GrantTrapImmunity { immunity } => round.trap_immunity = Some(immunity),
            Effect::UseTrapImmunity => match round.trap_immunity.take() {
                Some(immunity) => {
                    if let TrapImmunity::Cost(cost) = immunity {
                        player.adjust_score(-i64::from(cost));
                        summary.score_delta -= i64::from(cost);
                    }
                    summary.immunity_used = Some(immunity);
                }
                None => summary.notes.push("no trap immunity to spend".to_string()),
            },
            Effect::RetryOnFail => round.retry_on_fail = true,
            Effect::FreeRolls { count } => round.free_rolls = round.free_rolls.saturating_add(count),

            // 2. score
            Effect::ScoreDelta { amount } => {
                player.adjust_score(amount);
                summary.score_delta += amount;
            }

            // 3. position
            Effect::PositionDelta { column, delta } => {
                let moved = game.markers.shift_temporary(self.board, column, delta)?;
                summary.moves.push((column, moved));
            }
            Effect::PermanentDelta { column, delta } => {
                if game.markers.advance_permanent(self.board, column, delta)? {
                    summary.newly_topped.push(column);
                }
            }
            Effect::ClearColumnProgress { column } => {
                if game.markers.clear_column(column) {
                    summary.moves.push((column, None));
                }
            }
            Effect::TeleportTo { from, to } => {
                match game.markers.teleport(self.board, from, to)? {
                    TeleportOutcome::Moved(position) => {
                        summary.moves.push((from, None));
                        summary.moves.push((to, Some(position)));
                    }
                    TeleportOutcome::SourceCleared => {
                        summary.moves.push((from, None));
                        summary
                            .notes
                            .push(format!("column {to} could not take the marker"));
                    }
                    TeleportOutcome::NoMarker => summary
                        .notes
                        .push(format!("no marker in column {from} to move")),
                }
            }
            Effect::DirectTop { column } => {
                if game.markers.top_directly(self.board, column)? {
                    summary.newly_topped.push(column);
                }
            }
            Effect::CommitTemporary => {
                let topped = game
                    .markers
                    .convert_temporary_to_permanent(self.board, None)?;
                summary.newly_topped.extend(topped);
            }

            // 4. round control
            Effect::SkipRounds { count } => {
                round.skip_rounds = round.skip_rounds.saturating_add(count)
            }
            Effect::ForceRounds { count } => {
                round.forced_rounds = round.forced_rounds.saturating_add(count)
            }
            Effect::ForceEndRound { until_check_in } => {
                if game.round.phase == RoundPhase::Active {
                    let phase = if until_check_in {
                        RoundPhase::Locked
                    } else {
                        RoundPhase::Idle
                    };
                    game.close_round(phase, until_check_in);
                    summary.round_ended = true;
                }
                if until_check_in {
                    game.round.needs_check_in = true;
                    game.round.force_end_until_check_in = true;
                }
            }
            Effect::LockoutFor { minutes } => {
                let until = now + Duration::minutes(i64::from(minutes));
                round.lockout_until = Some(round.lockout_until.map_or(until, |u| u.max(until)));
            }
            Effect::ColumnFreeze { column } => {
                round.frozen_columns.insert(column);
            }
            Effect::SweetTalkBlock { source } => {
                let columns = if round.phase == RoundPhase::Active {
                    game.markers.round_columns().clone()
                } else {
                    round.last_round_columns.clone()
                };
                round.sweet_talk_block = Some(SweetTalkBlock { source, columns });
            }
            Effect::ClearLastRoll => round.last_roll = None,
            Effect::ReplaceLastRoll { faces } => {
                let current = round.last_roll.as_ref().ok_or_else(|| {
                    DomainError::invalid_state_transition("there is no roll to replace")
                })?;
                let split = if faces.len() == current.split().dice_count() {
                    current.split()
                } else {
                    GroupSplit::halves(faces.len())?
                };
                round.last_roll = Some(DiceRoll::new(faces, split)?);
            }

            // 5. dice modifiers for the next roll
            Effect::FixNextRoll { faces } => round.modifiers.arm(Modifier::FixedRoll { faces }),
            Effect::PartialFixRoll { faces } => {
                round.modifiers.arm(Modifier::PartialFix { faces })
            }
            Effect::AllowReroll { face } => round.modifiers.arm(Modifier::Reroll {
                faces: [face].into_iter().collect(),
            }),
            Effect::AllDiceModifier { delta } => round.modifiers.arm(Modifier::AllDice { delta }),
            Effect::NextDiceCount { split } => round.modifiers.arm(Modifier::DiceCount { split }),
            Effect::ExtraDieCheck => round.modifiers.arm(Modifier::ExtraDieCheck),
            Effect::OddEvenCheck => round.modifiers.arm(Modifier::OddEvenCheck),
            Effect::MathCheck => round.modifiers.arm(Modifier::MathCheck),

            // 6. side effects
            Effect::InventoryDelta { item, quantity } => summary.inventory.push((item, quantity)),
            Effect::Achievement { id } => summary.achievements.push(id),
            Effect::CountEvent { counter } => {
                let count = round.increment(counter);
                let (threshold, achievement) = counter.threshold();
                if count == threshold {
                    summary.achievements.push(achievement);
                }
            }
            Effect::UnlockShopItem { item } => summary.unlocked_items.push(item),
            Effect::CostReduction { amount } => {
                round.cost_reduction = round.cost_reduction.saturating_add(amount)
            }
            Effect::HalfPriceNextPurchase => round.half_price = true,
            Effect::ForPlayer { target, effects } => summary.deferred.push((target, effects)),

            // 7. choices
            Effect::RequireChoice { choice } => {
                if self.follow_up {
                    follow_ups.push(choice);
                } else {
                    round.pending.enqueue(choice);
                }
                summary.choices_enqueued += 1;
            }
        }
        Ok(())
    }
}
