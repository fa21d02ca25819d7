//! Game rules that act on entities: the round machine and the effect applier.

mod effect_applier;
mod round_machine;

pub use effect_applier::{EffectApplier, EffectSummary};
pub use round_machine::{
    ActiveEnd, CellArrival, MachineState, MoveOutcome, PassiveEnd, RollOutcome, RollReport,
    RoundStateMachine, VoidReason,
};
