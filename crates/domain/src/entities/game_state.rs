use serde::{Deserialize, Serialize};

use super::markers::PositionTracker;
use super::round_state::{RoundPhase, RoundState};
use crate::ids::PlayerId;

/// Everything persisted per player besides the profile, saved atomically.
///
/// `version` is the optimistic concurrency token: a save is accepted only
/// if the stored version still equals it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameState {
    pub player_id: PlayerId,
    pub round: RoundState,
    pub markers: PositionTracker,
    pub version: u64,
}

impl PlayerGameState {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            round: RoundState::new(),
            markers: PositionTracker::new(),
            version: 0,
        }
    }
}

impl PlayerGameState {
    /// Shut the current round. Temporary markers still on the board are
    /// dropped, so convert them first for an active end.
    pub(crate) fn close_round(&mut self, phase: RoundPhase, needs_check_in: bool) {
        self.round.last_round_columns = self.markers.round_columns().clone();
        self.markers.reset_round();
        self.round.phase = phase;
        self.round.needs_check_in |= needs_check_in;
        self.round.round_id = None;
        self.round.last_roll = None;
        self.round.disabled_columns.clear();
    }

    /// Flag the win the first time three columns are topped.
    pub(crate) fn claim_win(&mut self) -> bool {
        if self.round.has_won || self.markers.topped_count() < WINNING_COLUMNS {
            return false;
        }
        self.round.has_won = true;
        true
    }

    /// Record the global rank handed out for the win.
    pub fn set_rank(&mut self, rank: u32) {
        self.round.rank = Some(rank);
    }
}

/// Topped columns needed to win.
pub const WINNING_COLUMNS: usize = 3;
