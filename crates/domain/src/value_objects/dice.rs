//! Dice combination resolver
//!
//! A roll is a multiset of d6 faces split into two groups of fixed size. The
//! resolver enumerates every way to pick the first group and reports the
//! distinct unordered pairs of group sums. Each pair names the two columns
//! the player may advance in.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

/// Upper bound on dice in a single roll; keeps subset enumeration in a u32 mask.
pub const MAX_DICE: usize = 12;

/// Group sizes for partitioning a roll, e.g. 3+3 for six dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSplit {
    first: u8,
    second: u8,
}

impl GroupSplit {
    /// Six dice, two groups of three.
    pub const STANDARD: GroupSplit = GroupSplit {
        first: 3,
        second: 3,
    };

    pub fn new(first: u8, second: u8) -> Result<Self, DomainError> {
        if first == 0 || second == 0 {
            return Err(DomainError::validation(format!(
                "dice split {first}+{second} leaves a group empty"
            )));
        }
        if usize::from(first) + usize::from(second) > MAX_DICE {
            return Err(DomainError::validation(format!(
                "dice split {first}+{second} exceeds {MAX_DICE} dice"
            )));
        }
        Ok(Self { first, second })
    }

    /// An even split of `count` dice, the larger half second.
    pub fn halves(count: usize) -> Result<Self, DomainError> {
        let too_many = || DomainError::validation(format!("{count} dice cannot be split"));
        let first = u8::try_from(count / 2).map_err(|_| too_many())?;
        let second = u8::try_from(count - count / 2).map_err(|_| too_many())?;
        Self::new(first, second)
    }

    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn dice_count(&self) -> usize {
        usize::from(self.first) + usize::from(self.second)
    }
}

impl Default for GroupSplit {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for GroupSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

/// Unordered pair of group sums, stored low-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SumPair {
    low: u8,
    high: u8,
}

impl SumPair {
    pub fn new(a: u8, b: u8) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> u8 {
        self.low
    }

    pub fn high(&self) -> u8 {
        self.high
    }

    pub fn total(&self) -> u16 {
        u16::from(self.low) + u16::from(self.high)
    }

    pub fn contains(&self, value: u8) -> bool {
        self.low == value || self.high == value
    }

    pub fn values(&self) -> [u8; 2] {
        [self.low, self.high]
    }
}

impl fmt::Display for SumPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Every achievable unordered pair of group sums for `faces` under `split`.
///
/// Subsets that pick different physical dice but land on the same sums
/// collapse into a single pair. Deterministic for a given face sequence.
pub fn solve(faces: &[u8], split: GroupSplit) -> Result<BTreeSet<SumPair>, DomainError> {
    if faces.len() != split.dice_count() {
        return Err(DomainError::validation(format!(
            "{} dice cannot be split into groups of {} and {}",
            faces.len(),
            split.first(),
            split.second()
        )));
    }
    if let Some(face) = faces
        .iter()
        .find(|face| !(MIN_FACE..=MAX_FACE).contains(*face))
    {
        return Err(DomainError::validation(format!(
            "die face {face} is outside {MIN_FACE}-{MAX_FACE}"
        )));
    }

    let total: u8 = faces.iter().sum();
    let group = u32::from(split.first());
    let mut pairs = BTreeSet::new();

    for mask in 0u32..(1u32 << faces.len()) {
        if mask.count_ones() != group {
            continue;
        }
        let first: u8 = faces
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1 << index) != 0)
            .map(|(_, face)| *face)
            .sum();
        pairs.insert(SumPair::new(first, total - first));
    }

    Ok(pairs)
}

/// A resolved roll: faces, the split they were rolled under, and the
/// candidate pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    faces: Vec<u8>,
    split: GroupSplit,
    candidates: BTreeSet<SumPair>,
}

impl DiceRoll {
    pub fn new(faces: Vec<u8>, split: GroupSplit) -> Result<Self, DomainError> {
        let candidates = solve(&faces, split)?;
        Ok(Self {
            faces,
            split,
            candidates,
        })
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    pub fn split(&self) -> GroupSplit {
        self.split
    }

    pub fn candidates(&self) -> &BTreeSet<SumPair> {
        &self.candidates
    }

    /// Single value move: the value must appear in at least one pair.
    pub fn allows_single(&self, value: u8) -> bool {
        self.candidates.iter().any(|pair| pair.contains(value))
    }

    /// Two value move: the values must form one of the pairs.
    pub fn allows_pair(&self, a: u8, b: u8) -> bool {
        self.candidates.contains(&SumPair::new(a, b))
    }

    pub fn is_all(&self, face: u8) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| *f == face)
    }

    pub fn odd_count(&self) -> usize {
        self.faces.iter().filter(|face| *face % 2 == 1).count()
    }

    /// Distinct sums across all candidate pairs.
    pub fn distinct_sums(&self) -> usize {
        self.candidates
            .iter()
            .flat_map(|pair| pair.values())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(u8::to_string).collect();
        write!(f, "{}", faces.join(" "))
    }
}
