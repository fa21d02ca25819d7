//! Modifiers armed by effects and consumed by the next roll.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::dice::{GroupSplit, MAX_FACE, MIN_FACE};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    FixedRoll,
    PartialFix,
    Reroll,
    AllDice,
    DiceCount,
    ExtraDieCheck,
    OddEvenCheck,
    MathCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    FixedRoll { faces: Vec<u8> },
    PartialFix { faces: Vec<u8> },
    Reroll { faces: BTreeSet<u8> },
    AllDice { delta: i8 },
    DiceCount { split: GroupSplit },
    ExtraDieCheck,
    OddEvenCheck,
    MathCheck,
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::FixedRoll { .. } => ModifierKind::FixedRoll,
            Modifier::PartialFix { .. } => ModifierKind::PartialFix,
            Modifier::Reroll { .. } => ModifierKind::Reroll,
            Modifier::AllDice { .. } => ModifierKind::AllDice,
            Modifier::DiceCount { .. } => ModifierKind::DiceCount,
            Modifier::ExtraDieCheck => ModifierKind::ExtraDieCheck,
            Modifier::OddEvenCheck => ModifierKind::OddEvenCheck,
            Modifier::MathCheck => ModifierKind::MathCheck,
        }
    }
}

/// Modifiers waiting for the next roll, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveModifiers(BTreeMap<ModifierKind, Modifier>);

impl ActiveModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a modifier. Reroll faces merge and dice deltas add up; every other
    /// kind replaces the previous one.
    pub fn arm(&mut self, modifier: Modifier) {
        let merged = match (self.0.remove(&modifier.kind()), modifier) {
            (Some(Modifier::Reroll { faces: mut old }), Modifier::Reroll { faces }) => {
                old.extend(faces);
                Modifier::Reroll { faces: old }
            }
            (Some(Modifier::AllDice { delta: old }), Modifier::AllDice { delta }) => {
                Modifier::AllDice {
                    delta: old.saturating_add(delta),
                }
            }
            (_, modifier) => modifier,
        };
        self.0.insert(merged.kind(), merged);
    }

    pub fn get(&self, kind: ModifierKind) -> Option<&Modifier> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: ModifierKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.0.values()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drain every armed modifier into a single roll configuration.
    pub fn take_roll_modifiers(&mut self) -> RollModifiers {
        let mut roll = RollModifiers::default();
        for (_, modifier) in std::mem::take(&mut self.0) {
            match modifier {
                Modifier::FixedRoll { faces } => roll.fixed = Some(faces),
                Modifier::PartialFix { faces } => roll.partial = Some(faces),
                Modifier::Reroll { faces } => roll.reroll = faces,
                Modifier::AllDice { delta } => roll.all_dice = delta,
                Modifier::DiceCount { split } => roll.split = Some(split),
                Modifier::ExtraDieCheck => roll.extra_die_check = true,
                Modifier::OddEvenCheck => roll.odd_even_check = true,
                Modifier::MathCheck => roll.math_check = true,
            }
        }
        roll
    }
}

/// Configuration for one roll, drained from `ActiveModifiers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollModifiers {
    pub fixed: Option<Vec<u8>>,
    pub partial: Option<Vec<u8>>,
    pub reroll: BTreeSet<u8>,
    pub all_dice: i8,
    pub split: Option<GroupSplit>,
    pub extra_die_check: bool,
    pub odd_even_check: bool,
    pub math_check: bool,
}

impl RollModifiers {
    /// Split this roll is played under. A fixed roll whose length does not
    /// match the armed split is halved, which fails below two dice.
    pub fn split(&self) -> Result<GroupSplit, DomainError> {
        match (&self.fixed, self.split) {
            (Some(faces), Some(split)) if split.dice_count() == faces.len() => Ok(split),
            (Some(faces), _) => GroupSplit::halves(faces.len()),
            (None, split) => Ok(split.unwrap_or_default()),
        }
    }

    /// Produce faces for `split`. A fixed roll wins over a partial fix, which
    /// wins over plain random dice; rerolls and the all-dice delta only touch
    /// random dice.
    pub fn generate(&self, split: GroupSplit, dice: &mut dyn FnMut() -> u8) -> Vec<u8> {
        if let Some(faces) = &self.fixed {
            return faces.clone();
        }

        let count = split.dice_count();
        let fixed_prefix: &[u8] = self.partial.as_deref().unwrap_or(&[]);
        let mut faces: Vec<u8> = fixed_prefix.iter().copied().take(count).collect();
        while faces.len() < count {
            let mut face = dice();
            if self.reroll.contains(&face) {
                face = dice();
            }
            faces.push(shift_face(face, self.all_dice));
        }
        faces
    }
}

fn shift_face(face: u8, delta: i8) -> u8 {
    let shifted = i16::from(face) + i16::from(delta);
    shifted.clamp(i16::from(MIN_FACE), i16::from(MAX_FACE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(values: Vec<u8>) -> impl FnMut() -> u8 {
        let mut iter = values.into_iter();
        move || iter.next().unwrap_or(1)
    }

    #[test]
    fn reroll_faces_merge_and_deltas_add() {
        let mut active = ActiveModifiers::new();
        active.arm(Modifier::Reroll {
            faces: BTreeSet::from([1]),
        });
        active.arm(Modifier::Reroll {
            faces: BTreeSet::from([2]),
        });
        active.arm(Modifier::AllDice { delta: 1 });
        active.arm(Modifier::AllDice { delta: 1 });

        let roll = active.take_roll_modifiers();
        assert_eq!(roll.reroll, BTreeSet::from([1, 2]));
        assert_eq!(roll.all_dice, 2);
        assert!(active.is_empty());
    }

    #[test]
    fn fixed_roll_wins_over_partial() {
        let mut active = ActiveModifiers::new();
        active.arm(Modifier::PartialFix { faces: vec![6, 6] });
        active.arm(Modifier::FixedRoll {
            faces: vec![3, 3, 3, 4, 4, 4],
        });
        let roll = active.take_roll_modifiers();
        let mut dice = sequence(vec![1, 1, 1, 1, 1, 1]);
        assert_eq!(
            roll.generate(GroupSplit::STANDARD, &mut dice),
            vec![3, 3, 3, 4, 4, 4]
        );
    }

    #[test]
    fn partial_fix_fills_the_rest_randomly() {
        let roll = RollModifiers {
            partial: Some(vec![6, 6]),
            ..RollModifiers::default()
        };
        let mut dice = sequence(vec![1, 2, 3, 4]);
        assert_eq!(
            roll.generate(GroupSplit::STANDARD, &mut dice),
            vec![6, 6, 1, 2, 3, 4]
        );
    }

    #[test]
    fn reroll_and_delta_apply_to_random_dice() {
        let roll = RollModifiers {
            reroll: BTreeSet::from([1]),
            all_dice: 1,
            ..RollModifiers::default()
        };
        // first die shows 1 and is rerolled into 5, then shifted to 6
        let mut dice = sequence(vec![1, 5, 2, 3, 6, 4, 4]);
        assert_eq!(
            roll.generate(GroupSplit::STANDARD, &mut dice),
            vec![6, 3, 4, 6, 5, 5]
        );
    }

    #[test]
    fn dice_count_changes_split() {
        let split = GroupSplit::new(2, 2).expect("valid split");
        let roll = RollModifiers {
            split: Some(split),
            ..RollModifiers::default()
        };
        let mut dice = sequence(vec![2, 2, 2, 2]);
        assert_eq!(roll.split().expect("split"), split);
        assert_eq!(roll.generate(split, &mut dice).len(), 4);
    }

    #[test]
    fn a_fixed_roll_that_cannot_be_split_is_an_error() {
        let roll = RollModifiers {
            fixed: Some(vec![5]),
            ..RollModifiers::default()
        };
        assert!(matches!(roll.split(), Err(DomainError::Validation(_))));

        let odd = RollModifiers {
            fixed: Some(vec![1, 2, 3, 4, 5]),
            ..RollModifiers::default()
        };
        let split = odd.split().expect("split");
        assert_eq!((split.first(), split.second()), (2, 3));
    }
}
