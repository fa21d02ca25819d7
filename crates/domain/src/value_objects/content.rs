//! References from board cells into the content catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ColumnId, EncounterId, ItemId, TrapId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Encounter,
    Item,
    Trap,
}

/// Typed key into the content catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContentRef {
    Encounter(EncounterId),
    Item(ItemId),
    Trap(TrapId),
}

impl ContentRef {
    pub fn kind(&self) -> CellKind {
        match self {
            ContentRef::Encounter(_) => CellKind::Encounter,
            ContentRef::Item(_) => CellKind::Item,
            ContentRef::Trap(_) => CellKind::Trap,
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRef::Encounter(id) => write!(f, "{id}"),
            ContentRef::Item(id) => write!(f, "{id}"),
            ContentRef::Trap(id) => write!(f, "{id}"),
        }
    }
}

/// A (column, position) coordinate on the board. Positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    pub column: ColumnId,
    pub position: u8,
}

impl CellPosition {
    pub fn new(column: ColumnId, position: u8) -> Self {
        Self { column, position }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.position)
    }
}
