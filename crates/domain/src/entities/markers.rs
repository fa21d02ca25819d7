//! Position tracker
//!
//! Per-player marker state. Every column holds an optional permanent
//! checkpoint and an optional temporary marker for the active round. A
//! temporary marker always sits above the checkpoint; a new one starts at
//! `permanent + 1`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::error::DomainError;
use crate::ids::ColumnId;

/// Distinct columns a player may enter during one round.
pub const MAX_ROUND_COLUMNS: usize = 3;

/// Marker state of one column. Position 0 means no permanent marker yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProgress {
    pub permanent: u8,
    pub temporary: Option<u8>,
}

impl ColumnProgress {
    /// Where the next advance starts from.
    pub fn front(&self) -> u8 {
        self.temporary.unwrap_or(self.permanent)
    }

    fn is_empty(&self) -> bool {
        self.permanent == 0 && self.temporary.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetreatOutcome {
    Moved(u8),
    /// Retreated to or below the checkpoint; the temporary marker is gone.
    Removed,
    NoMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportOutcome {
    Moved(u8),
    /// The target could not take a marker; the source was cleared anyway.
    SourceCleared,
    NoMarker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionTracker {
    columns: BTreeMap<ColumnId, ColumnProgress>,
    topped: BTreeSet<ColumnId>,
    /// Columns that cost a slot this round. Removal of a marker keeps the slot.
    round_columns: BTreeSet<ColumnId>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn progress(&self, column: ColumnId) -> ColumnProgress {
        self.columns.get(&column).copied().unwrap_or_default()
    }

    pub fn temporary(&self, column: ColumnId) -> Option<u8> {
        self.progress(column).temporary
    }

    pub fn permanent(&self, column: ColumnId) -> u8 {
        self.progress(column).permanent
    }

    pub fn is_topped(&self, column: ColumnId) -> bool {
        self.topped.contains(&column)
    }

    pub fn topped(&self) -> &BTreeSet<ColumnId> {
        &self.topped
    }

    pub fn topped_count(&self) -> usize {
        self.topped.len()
    }

    pub fn round_columns(&self) -> &BTreeSet<ColumnId> {
        &self.round_columns
    }

    pub fn has_temporary(&self) -> bool {
        self.columns.values().any(|p| p.temporary.is_some())
    }

    /// Columns with a temporary marker and its position.
    pub fn temporary_markers(&self) -> impl Iterator<Item = (ColumnId, u8)> + '_ {
        self.columns
            .iter()
            .filter_map(|(column, p)| p.temporary.map(|position| (*column, position)))
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, ColumnProgress)> + '_ {
        self.columns.iter().map(|(column, p)| (*column, *p))
    }

    // =========================================================================
    // Advancing
    // =========================================================================

    /// Validate an advance of `steps` cells without changing anything and
    /// return the resulting position.
    pub fn check_advance(
        &self,
        board: &Board,
        column: ColumnId,
        steps: u8,
    ) -> Result<u8, DomainError> {
        if self.is_topped(column) {
            return Err(DomainError::validation(format!(
                "column {column} is already topped"
            )));
        }
        if !self.round_columns.contains(&column) && self.round_columns.len() >= MAX_ROUND_COLUMNS
        {
            return Err(DomainError::validation(format!(
                "all {MAX_ROUND_COLUMNS} columns for this round are in use ({}), column {column} cannot be entered",
                join_columns(&self.round_columns)
            )));
        }
        let height = board.height(column)?;
        let target = self.progress(column).front().saturating_add(steps);
        if target > height {
            return Err(DomainError::validation(format!(
                "column {column} has only {height} cells"
            )));
        }
        Ok(target)
    }

    /// Move the temporary marker up one cell, opening a round slot if needed.
    pub fn advance(&mut self, board: &Board, column: ColumnId) -> Result<u8, DomainError> {
        let target = self.check_advance(board, column, 1)?;
        self.round_columns.insert(column);
        self.columns.entry(column).or_default().temporary = Some(target);
        Ok(target)
    }

    /// Move the temporary marker by an effect. Negative deltas retreat;
    /// positive deltas clamp at the column height. Returns the new position,
    /// or `None` when nothing could move.
    pub fn shift_temporary(
        &mut self,
        board: &Board,
        column: ColumnId,
        delta: i32,
    ) -> Result<Option<u8>, DomainError> {
        if delta < 0 {
            let steps = u8::try_from(delta.unsigned_abs()).unwrap_or(u8::MAX);
            return Ok(match self.retreat(column, steps) {
                RetreatOutcome::Moved(position) => Some(position),
                RetreatOutcome::Removed | RetreatOutcome::NoMarker => None,
            });
        }

        let height = board.height(column)?;
        if self.is_topped(column)
            || (!self.round_columns.contains(&column)
                && self.round_columns.len() >= MAX_ROUND_COLUMNS)
        {
            return Ok(None);
        }
        let steps = u8::try_from(delta).unwrap_or(u8::MAX);
        let target = self.progress(column).front().saturating_add(steps).min(height);
        self.round_columns.insert(column);
        self.columns.entry(column).or_default().temporary = Some(target);
        Ok(Some(target))
    }

    // =========================================================================
    // Retreating and clearing
    // =========================================================================

    pub fn retreat(&mut self, column: ColumnId, steps: u8) -> RetreatOutcome {
        let Some(progress) = self.columns.get_mut(&column) else {
            return RetreatOutcome::NoMarker;
        };
        let Some(current) = progress.temporary else {
            return RetreatOutcome::NoMarker;
        };
        let target = current.saturating_sub(steps);
        if target <= progress.permanent {
            progress.temporary = None;
            self.prune(column);
            RetreatOutcome::Removed
        } else {
            progress.temporary = Some(target);
            RetreatOutcome::Moved(target)
        }
    }

    /// Remove the temporary marker in one column. Returns whether one existed.
    pub fn clear_temporary(&mut self, column: ColumnId) -> bool {
        let removed = self
            .columns
            .get_mut(&column)
            .and_then(|p| p.temporary.take())
            .is_some();
        self.prune(column);
        removed
    }

    /// Drop every temporary marker (failed or passively ended round).
    pub fn discard_temporary(&mut self) {
        for progress in self.columns.values_mut() {
            progress.temporary = None;
        }
        self.columns.retain(|_, p| !p.is_empty());
    }

    /// Wipe all progress in a column. Topped columns are left alone.
    pub fn clear_column(&mut self, column: ColumnId) -> bool {
        if self.is_topped(column) {
            return false;
        }
        self.columns.remove(&column).is_some()
    }

    /// Forget round slots and temporary markers before a new round.
    pub fn reset_round(&mut self) {
        self.discard_temporary();
        self.round_columns.clear();
    }

    // =========================================================================
    // Conversion and direct placement
    // =========================================================================

    /// Turn temporary markers into checkpoints (all, or one column) and
    /// return the columns topped by this conversion.
    pub fn convert_temporary_to_permanent(
        &mut self,
        board: &Board,
        only: Option<ColumnId>,
    ) -> Result<Vec<ColumnId>, DomainError> {
        let targets: Vec<(ColumnId, u8)> = self
            .temporary_markers()
            .filter(|(column, _)| only.map_or(true, |c| c == *column))
            .collect();

        // heights first so a missing column leaves everything untouched
        let heights = targets
            .iter()
            .map(|(column, _)| board.height(*column))
            .collect::<Result<Vec<_>, _>>()?;

        let mut newly_topped = Vec::new();
        for ((column, position), height) in targets.into_iter().zip(heights) {
            let progress = self.columns.entry(column).or_default();
            progress.permanent = position;
            progress.temporary = None;
            if position >= height && self.topped.insert(column) {
                newly_topped.push(column);
            }
        }
        Ok(newly_topped)
    }

    /// Raise the checkpoint directly. Returns whether the column got topped.
    pub fn advance_permanent(
        &mut self,
        board: &Board,
        column: ColumnId,
        steps: u8,
    ) -> Result<bool, DomainError> {
        let height = board.height(column)?;
        if self.is_topped(column) {
            return Ok(false);
        }
        let progress = self.columns.entry(column).or_default();
        progress.permanent = progress.permanent.saturating_add(steps).min(height);
        if progress.temporary.is_some_and(|t| t <= progress.permanent) {
            progress.temporary = None;
        }
        Ok(progress.permanent >= height && self.topped.insert(column))
    }

    /// Put the checkpoint at the top. Returns whether the column was newly topped.
    pub fn top_directly(&mut self, board: &Board, column: ColumnId) -> Result<bool, DomainError> {
        let height = board.height(column)?;
        let progress = self.columns.entry(column).or_default();
        progress.permanent = height;
        progress.temporary = None;
        Ok(self.topped.insert(column))
    }

    /// Move the temporary marker from one column to another, keeping its
    /// height where the target allows. The round slot moves with it.
    pub fn teleport(
        &mut self,
        board: &Board,
        from: ColumnId,
        to: ColumnId,
    ) -> Result<TeleportOutcome, DomainError> {
        let height = board.height(to)?;
        let Some(position) = self.temporary(from) else {
            return Ok(TeleportOutcome::NoMarker);
        };

        self.clear_temporary(from);
        if self.is_topped(to) || self.temporary(to).is_some() {
            return Ok(TeleportOutcome::SourceCleared);
        }

        self.round_columns.remove(&from);
        self.round_columns.insert(to);
        let progress = self.columns.entry(to).or_default();
        let target = position.max(progress.permanent + 1).min(height);
        progress.temporary = Some(target);
        Ok(TeleportOutcome::Moved(target))
    }

    fn prune(&mut self, column: ColumnId) {
        if self.columns.get(&column).is_some_and(ColumnProgress::is_empty) {
            self.columns.remove(&column);
        }
    }
}

fn join_columns(columns: &BTreeSet<ColumnId>) -> String {
    columns
        .iter()
        .map(ColumnId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(raw: u8) -> ColumnId {
        ColumnId::new(raw).expect("valid column")
    }

    #[test]
    fn advance_starts_above_checkpoint() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.advance(&board, column(7)), Ok(1));
        assert_eq!(tracker.advance(&board, column(7)), Ok(2));
        tracker
            .convert_temporary_to_permanent(&board, None)
            .expect("conversion");
        tracker.reset_round();
        assert_eq!(tracker.permanent(column(7)), 2);
        assert_eq!(tracker.advance(&board, column(7)), Ok(3));
    }

    #[test]
    fn fourth_column_is_rejected() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        for raw in [5, 7, 9] {
            tracker.advance(&board, column(raw)).expect("slot free");
        }
        let before = tracker.clone();
        assert!(matches!(
            tracker.advance(&board, column(11)),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(tracker, before);
        // reusing a column costs nothing
        assert!(tracker.advance(&board, column(9)).is_ok());
    }

    #[test]
    fn removed_marker_keeps_its_slot() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        for raw in [5, 7, 9] {
            tracker.advance(&board, column(raw)).expect("slot free");
        }
        assert_eq!(tracker.retreat(column(5), 3), RetreatOutcome::Removed);
        assert!(tracker.temporary(column(5)).is_none());
        assert!(tracker.advance(&board, column(11)).is_err());
        assert!(tracker.advance(&board, column(5)).is_ok());
    }

    #[test]
    fn advancing_past_height_is_rejected() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        for _ in 0..3 {
            tracker.advance(&board, column(3)).expect("within height");
        }
        assert!(tracker.check_advance(&board, column(3), 1).is_err());
        assert_eq!(
            tracker.convert_temporary_to_permanent(&board, None),
            Ok(vec![column(3)])
        );
        assert!(tracker.is_topped(column(3)));
        tracker.reset_round();
        assert!(tracker.advance(&board, column(3)).is_err());
    }

    #[test]
    fn retreat_clamps_at_checkpoint() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        tracker.advance(&board, column(10)).expect("advance");
        tracker.advance(&board, column(10)).expect("advance");
        tracker
            .convert_temporary_to_permanent(&board, None)
            .expect("conversion");
        for _ in 0..3 {
            tracker.advance(&board, column(10)).expect("advance");
        }
        assert_eq!(tracker.temporary(column(10)), Some(5));
        assert_eq!(tracker.retreat(column(10), 2), RetreatOutcome::Moved(3));
        assert_eq!(tracker.retreat(column(10), 1), RetreatOutcome::Removed);
        assert_eq!(tracker.permanent(column(10)), 2);
        assert_eq!(tracker.retreat(column(10), 1), RetreatOutcome::NoMarker);
    }

    #[test]
    fn conversion_of_a_single_column() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        tracker.advance(&board, column(4)).expect("advance");
        tracker.advance(&board, column(8)).expect("advance");
        tracker
            .convert_temporary_to_permanent(&board, Some(column(8)))
            .expect("conversion");
        assert_eq!(tracker.permanent(column(8)), 1);
        assert_eq!(tracker.temporary(column(4)), Some(1));
    }

    #[test]
    fn effect_advance_clamps_at_height() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.shift_temporary(&board, column(18), 5), Ok(Some(3)));
        assert_eq!(tracker.shift_temporary(&board, column(18), -1), Ok(Some(2)));
    }

    #[test]
    fn teleport_moves_marker_and_slot() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        for _ in 0..4 {
            tracker.advance(&board, column(10)).expect("advance");
        }
        assert_eq!(
            tracker.teleport(&board, column(10), column(4)),
            Ok(TeleportOutcome::Moved(4))
        );
        assert!(tracker.round_columns().contains(&column(4)));
        assert!(!tracker.round_columns().contains(&column(10)));
        assert!(tracker.temporary(column(10)).is_none());
    }

    #[test]
    fn teleport_onto_topped_column_only_clears_source() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        tracker.top_directly(&board, column(3)).expect("top");
        tracker.advance(&board, column(6)).expect("advance");
        assert_eq!(
            tracker.teleport(&board, column(6), column(3)),
            Ok(TeleportOutcome::SourceCleared)
        );
        assert!(!tracker.has_temporary());
    }

    #[test]
    fn permanent_advance_can_top() {
        let board = Board::standard();
        let mut tracker = PositionTracker::new();
        assert_eq!(tracker.advance_permanent(&board, column(17), 2), Ok(false));
        assert_eq!(tracker.advance_permanent(&board, column(17), 5), Ok(true));
        assert_eq!(tracker.permanent(column(17)), 4);
        assert_eq!(tracker.topped_count(), 1);
    }
}
