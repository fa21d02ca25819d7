//! The static board: sixteen columns of content cells.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ColumnId, EncounterId, ItemId, TrapId};
use crate::value_objects::{CellKind, CellPosition, ContentRef};

/// A board position tagged with catalog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCell {
    pub position: u8,
    pub content: ContentRef,
}

impl ContentCell {
    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    id: ColumnId,
    cells: Vec<ContentCell>,
}

impl BoardColumn {
    pub fn new(id: ColumnId, contents: Vec<ContentRef>) -> Self {
        let cells = contents
            .into_iter()
            .zip(1u8..)
            .map(|(content, position)| ContentCell { position, content })
            .collect();
        Self { id, cells }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Number of cells; reaching this position tops the column.
    pub fn height(&self) -> u8 {
        u8::try_from(self.cells.len()).unwrap_or(u8::MAX)
    }

    pub fn cells(&self) -> &[ContentCell] {
        &self.cells
    }

    /// Cell at a 1-based position.
    pub fn cell(&self, position: u8) -> Option<&ContentCell> {
        usize::from(position)
            .checked_sub(1)
            .and_then(|index| self.cells.get(index))
    }
}

/// The full board, indexed by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: BTreeMap<ColumnId, BoardColumn>,
}

impl Board {
    pub fn new(columns: impl IntoIterator<Item = BoardColumn>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| (c.id(), c)).collect(),
        }
    }

    /// The standard layout. Heights run 3,4,..,10,10,..,4,3 for columns 3..=18.
    pub fn standard() -> Self {
        use CellSpec::{E, I, T};

        let layout: [(u8, &[CellSpec]); 16] = [
            (3, &[E(3), I(10), T(13)]),
            (4, &[E(5), I(16), T(14), E(57)]),
            (5, &[E(7), T(19), I(8), E(23), E(45)]),
            (6, &[E(8), E(26), T(1), I(17), E(36), E(58)]),
            (7, &[E(19), E(43), E(15), T(3), I(1), I(22), E(52)]),
            (8, &[I(15), E(22), E(10), T(18), I(4), E(25), E(37), E(56)]),
            (
                9,
                &[E(38), I(11), E(18), E(16), E(21), E(53), T(9), I(20), T(17)],
            ),
            (
                10,
                &[E(48), E(30), I(5), T(8), E(1), I(9), T(4), E(33), E(50), E(46)],
            ),
            (
                11,
                &[E(39), T(11), I(6), E(44), E(20), T(2), E(51), E(59), E(4), I(18)],
            ),
            (
                12,
                &[E(55), E(14), E(35), T(5), I(2), E(31), T(15), E(49), I(24)],
            ),
            (13, &[E(27), E(9), E(34), T(6), E(24), I(3), E(54), I(23)]),
            (14, &[E(40), I(12), T(7), E(32), E(12), I(21), E(60)]),
            (15, &[E(41), E(6), T(12), E(11), I(14), E(47)]),
            (16, &[E(28), E(13), I(7), T(20), E(42)]),
            (17, &[E(17), E(29), T(17), I(19)]),
            (18, &[E(2), I(13), T(10)]),
        ];

        Self::new(layout.iter().map(|(column, cells)| {
            BoardColumn::new(
                ColumnId::new_unchecked(*column),
                cells.iter().map(|cell| cell.content()).collect(),
            )
        }))
    }

    pub fn column(&self, id: ColumnId) -> Result<&BoardColumn, DomainError> {
        self.columns
            .get(&id)
            .ok_or_else(|| DomainError::not_found("Column", id.to_string()))
    }

    pub fn height(&self, id: ColumnId) -> Result<u8, DomainError> {
        self.column(id).map(BoardColumn::height)
    }

    pub fn cell(&self, at: CellPosition) -> Option<&ContentCell> {
        self.columns
            .get(&at.column)
            .and_then(|column| column.cell(at.position))
    }

    pub fn columns(&self) -> impl Iterator<Item = &BoardColumn> {
        self.columns.values()
    }
}

#[derive(Clone, Copy)]
enum CellSpec {
    E(u16),
    I(u16),
    T(u16),
}

impl CellSpec {
    fn content(self) -> ContentRef {
        match self {
            CellSpec::E(id) => ContentRef::Encounter(EncounterId::new(id)),
            CellSpec::I(id) => ContentRef::Item(ItemId::new(id)),
            CellSpec::T(id) => ContentRef::Trap(TrapId::new(id)),
        }
    }
}
