//! Round use cases.
//!
//! Start, roll, move, end, check in and answer choices. Each loads the
//! player's session, runs the pure round machine, hands content and effects
//! to the catalog and the `EffectRouter`, and saves once.

mod check_in;
mod end_round;
mod record_move;
mod resolve_choice;
mod roll_dice;
mod start_round;

use std::sync::Arc;

use cantstop_domain::RoundStateMachine;

use super::effects::EffectRouter;

pub use check_in::CheckIn;
pub use end_round::{EndMode, EndRound};
pub use record_move::RecordMove;
pub use resolve_choice::ResolveChoice;
pub use roll_dice::{RollDice, RollResult};
pub use start_round::StartRound;

/// Container for round use cases.
#[derive(Clone)]
pub struct RoundUseCases {
    pub start: Arc<StartRound>,
    pub roll: Arc<RollDice>,
    pub record_move: Arc<RecordMove>,
    pub end: Arc<EndRound>,
    pub check_in: Arc<CheckIn>,
    pub resolve_choice: Arc<ResolveChoice>,
}

impl RoundUseCases {
    pub fn new(
        start: Arc<StartRound>,
        roll: Arc<RollDice>,
        record_move: Arc<RecordMove>,
        end: Arc<EndRound>,
        check_in: Arc<CheckIn>,
        resolve_choice: Arc<ResolveChoice>,
    ) -> Self {
        Self {
            start,
            roll,
            record_move,
            end,
            check_in,
            resolve_choice,
        }
    }
}

fn machine(router: &EffectRouter) -> RoundStateMachine<'_> {
    RoundStateMachine::new(router.board(), router.settings().roll_cost)
}
