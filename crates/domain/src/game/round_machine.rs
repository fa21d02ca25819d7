//! Round state machine
//!
//! Idle -> Active -> (AwaitingChoice) -> Locked -> Idle. Every operation
//! validates before it mutates, so a rejected command leaves the player and
//! the game state exactly as they were.

use chrono::{DateTime, Utc};

use crate::entities::{Board, ContentCell, Player, PlayerGameState, RollRecord, RoundPhase};
use crate::error::DomainError;
use crate::ids::{AchievementId, ColumnId, RoundId};
use crate::value_objects::{
    CellPosition, DiceRoll, PendingChoice, ResolvedAnswer, RollModifiers, SumPair,
};

/// Failures in a row that earn the crying student title.
const CRYING_FAILURES: u32 = 3;

/// Player-facing state, with the choice gate made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    Active,
    AwaitingChoice,
    Locked,
}

impl MachineState {
    pub fn of(game: &PlayerGameState) -> Self {
        match game.round.phase() {
            RoundPhase::Idle => MachineState::Idle,
            RoundPhase::Locked => MachineState::Locked,
            RoundPhase::Active if !game.round.pending().is_empty() => {
                MachineState::AwaitingChoice
            }
            RoundPhase::Active => MachineState::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoidReason {
    /// The check die came up 6.
    ExtraDie { face: u8 },
    /// Three or fewer odd faces.
    OddEven { odd: usize },
    /// Fewer than eight distinct sums.
    Math { distinct: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// A skip was spent instead of rolling.
    Skipped { remaining: u32 },
    Rolled {
        roll: DiceRoll,
        playable: Vec<SumPair>,
        bonus_die: Option<u8>,
    },
    /// A trap check failed; the round continues without a roll.
    Voided { faces: Vec<u8>, reason: VoidReason },
    /// No playable pair, but a retry saved the round.
    Rescued { faces: Vec<u8> },
    /// No playable pair; temporary progress is gone.
    Failed { faces: Vec<u8>, failures: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollReport {
    pub charged: u32,
    pub free_roll_used: bool,
    pub outcome: RollOutcome,
    pub achievements: Vec<AchievementId>,
}

/// A column whose marker ended a move on a content cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellArrival {
    pub at: CellPosition,
    pub cell: Option<ContentCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub arrivals: Vec<CellArrival>,
    /// Columns whose temporary marker now sits at the top.
    pub at_top: Vec<ColumnId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnd {
    pub newly_topped: Vec<ColumnId>,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassiveEnd {
    /// Retry was armed; the round goes on with markers untouched.
    Retried,
    Ended,
}

enum Charge {
    FreeRoll,
    Score(u32),
}

pub struct RoundStateMachine<'a> {
    board: &'a Board,
    roll_cost: u32,
}

impl<'a> RoundStateMachine<'a> {
    pub fn new(board: &'a Board, roll_cost: u32) -> Self {
        Self { board, roll_cost }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    // =========================================================================
    // Start
    // =========================================================================

    pub fn start_round(
        &self,
        player: &Player,
        game: &mut PlayerGameState,
        now: DateTime<Utc>,
    ) -> Result<RoundId, DomainError> {
        if player.faction().is_none() {
            return Err(DomainError::invalid_state_transition(
                "choose a faction before starting a round",
            ));
        }
        if game.round.phase == RoundPhase::Active {
            return Err(DomainError::invalid_state_transition(
                "a round is already in progress",
            ));
        }
        if let Some(until) = game.round.lockout_until {
            if until > now {
                let minutes = (until - now).num_minutes().max(1);
                return Err(DomainError::invalid_state_transition(format!(
                    "locked out for another {minutes} minute(s)"
                )));
            }
        }
        if game.round.force_end_until_check_in {
            return Err(DomainError::invalid_state_transition(
                "you were forced out; check in before playing again",
            ));
        }
        if game.round.needs_check_in || game.round.phase == RoundPhase::Locked {
            return Err(DomainError::invalid_state_transition(
                "check in for the previous round first",
            ));
        }
        if !game.round.pending.is_empty() {
            return Err(DomainError::invalid_state_transition(
                "resolve the pending choice first",
            ));
        }

        let round_id = RoundId::new();
        game.round.lockout_until = None;
        game.markers.reset_round();
        game.round.phase = RoundPhase::Active;
        game.round.round_id = Some(round_id);
        game.round.last_roll = None;
        game.round.disabled_columns = game
            .round
            .sweet_talk_block
            .take()
            .map(|block| block.columns)
            .unwrap_or_default();
        Ok(round_id)
    }

    // =========================================================================
    // Roll
    // =========================================================================

    /// Roll for the active round. `dice` produces one face in 1..=6 per call.
    pub fn roll(
        &self,
        player: &mut Player,
        game: &mut PlayerGameState,
        requested: Option<u8>,
        dice: &mut dyn FnMut() -> u8,
        now: DateTime<Utc>,
    ) -> Result<RollReport, DomainError> {
        ensure_playing(game)?;

        let charge = self.plan_charge(player, game)?;

        if game.round.skip_rounds > 0 {
            let (charged, free_roll_used) = apply_charge(player, game, charge)?;
            game.round.skip_rounds -= 1;
            return Ok(RollReport {
                charged,
                free_roll_used,
                outcome: RollOutcome::Skipped {
                    remaining: game.round.skip_rounds,
                },
                achievements: Vec::new(),
            });
        }

        let mut armed = game.round.modifiers.clone();
        let modifiers = armed.take_roll_modifiers();
        let split = modifiers.split()?;
        if let Some(count) = requested {
            if usize::from(count) != split.dice_count() {
                return Err(DomainError::validation(format!(
                    "this roll uses {} dice, not {count}",
                    split.dice_count()
                )));
            }
        }

        let roll = DiceRoll::new(modifiers.generate(split, dice), split)?;

        // Nothing below can fail.
        let (charged, free_roll_used) = apply_charge(player, game, charge)?;
        game.round.modifiers = armed;
        game.round.dice_history.push(RollRecord {
            round_id: game.round.round_id,
            faces: roll.faces().to_vec(),
            rolled_at: now,
        });

        let mut achievements = Vec::new();
        if roll.is_all(1) {
            achievements.push(AchievementId::all_ones());
        }
        if roll.is_all(6) {
            achievements.push(AchievementId::all_sixes());
        }

        game.round.last_roll = None;
        let outcome = self.settle(game, roll, &modifiers, dice, &mut achievements);
        Ok(RollReport {
            charged,
            free_roll_used,
            outcome,
            achievements,
        })
    }

    /// Run armed checks on a fresh roll and decide whether the round goes on.
    fn settle(
        &self,
        game: &mut PlayerGameState,
        roll: DiceRoll,
        modifiers: &RollModifiers,
        dice: &mut dyn FnMut() -> u8,
        achievements: &mut Vec<AchievementId>,
    ) -> RollOutcome {
        let voided = |reason| RollOutcome::Voided {
            faces: roll.faces().to_vec(),
            reason,
        };

        if modifiers.extra_die_check {
            let face = dice();
            if face == 6 {
                return voided(VoidReason::ExtraDie { face });
            }
        }
        let mut bonus_die = None;
        if modifiers.odd_even_check {
            let odd = roll.odd_count();
            if odd <= 3 {
                return voided(VoidReason::OddEven { odd });
            }
            bonus_die = Some(dice());
        }
        if modifiers.math_check {
            let distinct = roll.distinct_sums();
            if distinct < 8 {
                return voided(VoidReason::Math { distinct });
            }
        }

        let playable = self.playable_pairs(game, &roll);
        if playable.is_empty() {
            let faces = roll.faces().to_vec();
            if game.round.retry_on_fail {
                game.round.retry_on_fail = false;
                return RollOutcome::Rescued { faces };
            }
            game.close_round(RoundPhase::Idle, false);
            game.round.failure_count = game.round.failure_count.saturating_add(1);
            if game.round.failure_count == CRYING_FAILURES {
                achievements.push(AchievementId::crying_student());
            }
            return RollOutcome::Failed {
                faces,
                failures: game.round.failure_count,
            };
        }

        game.round.last_roll = Some(roll.clone());
        RollOutcome::Rolled {
            roll,
            playable,
            bonus_die,
        }
    }

    fn plan_charge(&self, player: &Player, game: &PlayerGameState) -> Result<Charge, DomainError> {
        if game.round.free_rolls > 0 {
            return Ok(Charge::FreeRoll);
        }
        let cost = self.roll_cost.saturating_sub(game.round.cost_reduction);
        if player.current_score() < i64::from(cost) {
            return Err(DomainError::resource(format!(
                "a roll costs {cost} points, you have {}",
                player.current_score()
            )));
        }
        Ok(Charge::Score(cost))
    }

    /// Pairs with at least one value the player can still advance in.
    pub fn playable_pairs(&self, game: &PlayerGameState, roll: &DiceRoll) -> Vec<SumPair> {
        roll.candidates()
            .iter()
            .filter(|pair| pair.values().iter().any(|v| self.can_enter(game, *v)))
            .copied()
            .collect()
    }

    fn can_enter(&self, game: &PlayerGameState, value: u8) -> bool {
        ColumnId::new(value).is_ok_and(|column| {
            !game.round.is_column_blocked(column)
                && game.markers.check_advance(self.board, column, 1).is_ok()
        })
    }

    // =========================================================================
    // Move
    // =========================================================================

    /// Advance one cell per value. A single value must appear in some
    /// candidate pair; two values must form one.
    pub fn record_move(
        &self,
        game: &mut PlayerGameState,
        values: &[u8],
    ) -> Result<MoveOutcome, DomainError> {
        ensure_playing(game)?;
        let roll = game
            .round
            .last_roll
            .as_ref()
            .ok_or_else(|| DomainError::invalid_state_transition("roll before moving"))?;

        let allowed = match values {
            [single] => roll.allows_single(*single),
            [a, b] => roll.allows_pair(*a, *b),
            _ => {
                return Err(DomainError::validation(
                    "record one or two values from the roll",
                ))
            }
        };
        if !allowed {
            let options: Vec<String> = roll.candidates().iter().map(SumPair::to_string).collect();
            return Err(DomainError::validation(format!(
                "{values:?} is not a combination of this roll; options: {}",
                options.join(" ")
            )));
        }

        let mut markers = game.markers.clone();
        let mut touched: Vec<ColumnId> = Vec::new();
        for value in values {
            let column = ColumnId::new(*value)?;
            if game.round.frozen_columns.contains(&column) {
                return Err(DomainError::validation(format!(
                    "column {column} is frozen until your next check-in"
                )));
            }
            if game.round.disabled_columns.contains(&column) {
                return Err(DomainError::validation(format!(
                    "column {column} is blocked for this round"
                )));
            }
            markers.advance(self.board, column)?;
            if !touched.contains(&column) {
                touched.push(column);
            }
        }

        let mut arrivals = Vec::with_capacity(touched.len());
        let mut at_top = Vec::new();
        for column in touched {
            let position = markers.temporary(column).unwrap_or_default();
            let at = CellPosition::new(column, position);
            arrivals.push(CellArrival {
                at,
                cell: self.board.cell(at).copied(),
            });
            if position >= self.board.height(column)? {
                at_top.push(column);
            }
        }

        game.markers = markers;
        game.round.last_roll = None;
        game.round.forced_rounds = game.round.forced_rounds.saturating_sub(1);
        Ok(MoveOutcome { arrivals, at_top })
    }

    // =========================================================================
    // End and check-in
    // =========================================================================

    /// Bank the round: temporary markers become permanent.
    pub fn end_round_active(&self, game: &mut PlayerGameState) -> Result<ActiveEnd, DomainError> {
        ensure_active(game)?;
        if !game.round.pending.is_empty() {
            return Err(DomainError::invalid_state_transition(
                "resolve the pending choice first",
            ));
        }
        if game.round.forced_rounds > 0 {
            return Err(DomainError::invalid_state_transition(format!(
                "you must keep moving for {} more roll(s)",
                game.round.forced_rounds
            )));
        }
        if game.round.skip_rounds > 0 {
            return Err(DomainError::invalid_state_transition(format!(
                "{} skipped roll(s) must be served first",
                game.round.skip_rounds
            )));
        }

        let newly_topped = game
            .markers
            .convert_temporary_to_permanent(self.board, None)?;
        game.close_round(RoundPhase::Locked, true);
        let won = game.claim_win();
        Ok(ActiveEnd { newly_topped, won })
    }

    /// Give up the round. Progress is lost unless a retry is armed.
    pub fn end_round_passive(&self, game: &mut PlayerGameState) -> Result<PassiveEnd, DomainError> {
        ensure_active(game)?;
        if !game.round.pending.is_empty() {
            return Err(DomainError::invalid_state_transition(
                "resolve the pending choice first",
            ));
        }
        if game.round.retry_on_fail {
            game.round.retry_on_fail = false;
            return Ok(PassiveEnd::Retried);
        }
        game.close_round(RoundPhase::Locked, true);
        Ok(PassiveEnd::Ended)
    }

    pub fn check_in(&self, game: &mut PlayerGameState) -> Result<(), DomainError> {
        let round = &mut game.round;
        if round.phase != RoundPhase::Locked
            && !round.needs_check_in
            && !round.force_end_until_check_in
        {
            return Err(DomainError::invalid_state_transition(
                "there is nothing to check in",
            ));
        }
        if round.phase == RoundPhase::Locked {
            round.phase = RoundPhase::Idle;
        }
        round.needs_check_in = false;
        round.force_end_until_check_in = false;
        round.frozen_columns.clear();
        Ok(())
    }

    // =========================================================================
    // Choices and win
    // =========================================================================

    /// Validate `answer` against the head of the queue and pop it.
    pub fn resolve_choice(
        &self,
        game: &mut PlayerGameState,
        answer: &str,
    ) -> Result<(PendingChoice, ResolvedAnswer), DomainError> {
        game.round.pending.resolve(answer)
    }

    /// True exactly once: the first time three columns are topped.
    pub fn claim_win(&self, game: &mut PlayerGameState) -> bool {
        game.claim_win()
    }
}

fn ensure_active(game: &PlayerGameState) -> Result<(), DomainError> {
    if game.round.phase != RoundPhase::Active {
        return Err(DomainError::invalid_state_transition("no round in progress"));
    }
    Ok(())
}

fn ensure_playing(game: &PlayerGameState) -> Result<(), DomainError> {
    ensure_active(game)?;
    if let Some(choice) = game.round.pending.head() {
        return Err(DomainError::invalid_state_transition(format!(
            "answer the pending choice first: {}",
            choice.prompt()
        )));
    }
    Ok(())
}

fn apply_charge(
    player: &mut Player,
    game: &mut PlayerGameState,
    charge: Charge,
) -> Result<(u32, bool), DomainError> {
    match charge {
        Charge::FreeRoll => {
            game.round.free_rolls -= 1;
            Ok((0, true))
        }
        Charge::Score(cost) => {
            player.spend(cost, "a roll")?;
            Ok((cost, false))
        }
    }
}
