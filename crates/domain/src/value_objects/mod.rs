//! Value objects: immutable game vocabulary.

mod choice;
mod content;
pub mod dice;
mod effect;
mod faction;
mod modifiers;

pub use choice::{normalize_answer, ChoiceSpec, PendingChoice, ResolvedAnswer};
pub use content::{CellKind, CellPosition, ContentRef};
pub use dice::{solve, DiceRoll, GroupSplit, SumPair};
pub use effect::{CounterKind, Effect, EffectCategory, EffectTarget, TrapImmunity};
pub use faction::Faction;
pub use modifiers::{ActiveModifiers, Modifier, ModifierKind, RollModifiers};
