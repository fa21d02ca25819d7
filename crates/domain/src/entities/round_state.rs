//! Per-player round state
//!
//! Everything the round machine and the effect applier read or write besides
//! markers and score. One-shot dice modifiers live in the typed
//! `ActiveModifiers` map; counters and flags that outlive a single roll are
//! explicit fields.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pending_choice::PendingChoiceQueue;
use crate::ids::{ColumnId, ItemId, PlayerId, RoundId};
use crate::value_objects::{ActiveModifiers, CounterKind, DiceRoll, TrapImmunity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    #[default]
    Idle,
    Active,
    /// Ended; waits for a check-in.
    Locked,
}

/// One entry of the append-only dice log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub round_id: Option<RoundId>,
    pub faces: Vec<u8>,
    pub rolled_at: DateTime<Utc>,
}

/// Columns another player talked us out of for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweetTalkBlock {
    pub source: PlayerId,
    pub columns: BTreeSet<ColumnId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub(crate) phase: RoundPhase,
    pub(crate) round_id: Option<RoundId>,
    pub(crate) pending: PendingChoiceQueue,
    pub(crate) last_roll: Option<DiceRoll>,
    pub(crate) dice_history: Vec<RollRecord>,
    pub(crate) modifiers: ActiveModifiers,

    // Long-lived effect state
    pub(crate) trap_immunity: Option<TrapImmunity>,
    pub(crate) retry_on_fail: bool,
    pub(crate) skip_rounds: u32,
    pub(crate) forced_rounds: u32,
    pub(crate) free_rolls: u32,
    pub(crate) lockout_until: Option<DateTime<Utc>>,
    pub(crate) needs_check_in: bool,
    pub(crate) force_end_until_check_in: bool,
    pub(crate) sweet_talk_block: Option<SweetTalkBlock>,
    pub(crate) last_round_columns: BTreeSet<ColumnId>,
    pub(crate) disabled_columns: BTreeSet<ColumnId>,
    pub(crate) frozen_columns: BTreeSet<ColumnId>,

    // Progress and bookkeeping
    pub(crate) failure_count: u32,
    pub(crate) has_won: bool,
    pub(crate) rank: Option<u32>,
    pub(crate) cost_reduction: u32,
    pub(crate) half_price: bool,
    pub(crate) last_used_item: Option<ItemId>,
    pub(crate) counters: BTreeMap<CounterKind, u32>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn round_id(&self) -> Option<RoundId> {
        self.round_id
    }

    pub fn pending(&self) -> &PendingChoiceQueue {
        &self.pending
    }

    pub fn last_roll(&self) -> Option<&DiceRoll> {
        self.last_roll.as_ref()
    }

    pub fn dice_history(&self) -> &[RollRecord] {
        &self.dice_history
    }

    pub fn modifiers(&self) -> &ActiveModifiers {
        &self.modifiers
    }

    pub fn trap_immunity(&self) -> Option<TrapImmunity> {
        self.trap_immunity
    }

    pub fn retry_on_fail(&self) -> bool {
        self.retry_on_fail
    }

    pub fn skip_rounds(&self) -> u32 {
        self.skip_rounds
    }

    pub fn forced_rounds(&self) -> u32 {
        self.forced_rounds
    }

    pub fn free_rolls(&self) -> u32 {
        self.free_rolls
    }

    pub fn lockout_until(&self) -> Option<DateTime<Utc>> {
        self.lockout_until
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_until.is_some_and(|until| until > now)
    }

    pub fn needs_check_in(&self) -> bool {
        self.needs_check_in
    }

    pub fn force_end_until_check_in(&self) -> bool {
        self.force_end_until_check_in
    }

    pub fn sweet_talk_block(&self) -> Option<&SweetTalkBlock> {
        self.sweet_talk_block.as_ref()
    }

    pub fn last_round_columns(&self) -> &BTreeSet<ColumnId> {
        &self.last_round_columns
    }

    pub fn disabled_columns(&self) -> &BTreeSet<ColumnId> {
        &self.disabled_columns
    }

    pub fn frozen_columns(&self) -> &BTreeSet<ColumnId> {
        &self.frozen_columns
    }

    /// Columns that cannot be advanced in right now.
    pub fn is_column_blocked(&self, column: ColumnId) -> bool {
        self.disabled_columns.contains(&column) || self.frozen_columns.contains(&column)
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    pub fn cost_reduction(&self) -> u32 {
        self.cost_reduction
    }

    pub fn half_price(&self) -> bool {
        self.half_price
    }

    pub fn last_used_item(&self) -> Option<ItemId> {
        self.last_used_item
    }

    pub fn counter(&self, kind: CounterKind) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    // =========================================================================
    // Mutations used outside the round machine
    // =========================================================================

    /// Consume the half-price coupon, if any.
    pub fn take_half_price(&mut self) -> bool {
        std::mem::take(&mut self.half_price)
    }

    pub fn set_last_used_item(&mut self, item: ItemId) {
        self.last_used_item = Some(item);
    }

    /// Bump a counter and return its new value.
    pub(crate) fn increment(&mut self, kind: CounterKind) -> u32 {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter = counter.saturating_add(1);
        *counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_state_is_idle() {
        let state = RoundState::new();
        assert_eq!(state.phase(), RoundPhase::Idle);
        assert!(state.pending().is_empty());
        assert!(state.last_roll().is_none());
    }

    #[test]
    fn lockout_is_compared_to_now() {
        let now = Utc::now();
        let mut state = RoundState::new();
        state.lockout_until = Some(now + Duration::minutes(5));
        assert!(state.is_locked_out(now));
        assert!(!state.is_locked_out(now + Duration::minutes(6)));
    }

    #[test]
    fn half_price_coupon_is_single_use() {
        let mut state = RoundState::new();
        state.half_price = true;
        assert!(state.take_half_price());
        assert!(!state.take_half_price());
    }

    #[test]
    fn counters_accumulate() {
        let mut state = RoundState::new();
        assert_eq!(state.increment(CounterKind::TrapsTriggered), 1);
        assert_eq!(state.increment(CounterKind::TrapsTriggered), 2);
        assert_eq!(state.counter(CounterKind::ItemsCollected), 0);
    }
}
