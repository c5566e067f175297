//! Row source contract and in-memory row index.
//!
//! # Responsibility
//! - Define the data-source seam the list core reads rows through.
//! - Provide an ordered in-memory implementation with a pinned partition.
//!
//! # Invariants
//! - All pinned rows precede all unpinned rows; the partition boundary is
//!   exactly the number of pinned rows.
//! - A row id appears at most once.
//! - Reorders move the dragged group as one block in its current relative
//!   order, then re-partition stably.

use crate::model::row::{Row, RowId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by row source mutations.
pub type RowIndexResult<T> = Result<T, RowIndexError>;

/// Errors from row source mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIndexError {
    /// Row id is already present in the index.
    DuplicateRow(RowId),
    /// Row id is not present in the index.
    RowNotFound(RowId),
    /// Ordinal position does not resolve to a row.
    PositionOutOfRange { position: usize, len: usize },
    /// Reorder request carried no row ids.
    EmptyMove,
}

impl Display for RowIndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRow(id) => write!(f, "row already present: {id}"),
            Self::RowNotFound(id) => write!(f, "row not found: {id}"),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "row position {position} out of range for {len} rows")
            }
            Self::EmptyMove => write!(f, "reorder requires at least one row"),
        }
    }
}

impl Error for RowIndexError {}

/// Read/mutate contract for the ordered rows backing the list.
///
/// Implemented by the owning store; `RowIndex` is the in-memory version.
pub trait RowSource {
    /// Number of rows in the current ordering.
    fn row_count(&self) -> usize;
    /// Row at one ordinal position.
    fn row_at(&self, position: usize) -> Option<Row>;
    /// Current ordinal position of one row id.
    fn position_of(&self, id: RowId) -> Option<usize>;
    /// Moves `ids` as one block so the block starts at `new_position` among
    /// the rows that are not being moved.
    fn reorder(&mut self, ids: &[RowId], new_position: usize) -> RowIndexResult<()>;
    /// Deletes the row at one ordinal position.
    fn delete_at(&mut self, position: usize) -> RowIndexResult<Row>;

    /// Resolves one row by id.
    fn row(&self, id: RowId) -> Option<Row> {
        self.position_of(id).and_then(|position| self.row_at(position))
    }

    fn is_pinned(&self, id: RowId) -> bool {
        self.row(id).is_some_and(|row| row.pinned)
    }

    fn has_interactive_content(&self, id: RowId) -> bool {
        self.row(id).is_some_and(|row| row.has_interactive_content)
    }

    /// Number of rows in the pinned prefix.
    fn pinned_count(&self) -> usize {
        (0..self.row_count())
            .filter_map(|position| self.row_at(position))
            .take_while(|row| row.pinned)
            .count()
    }

    fn has_pinned(&self) -> bool {
        self.pinned_count() > 0
    }

    fn is_first_pinned(&self, id: RowId) -> bool {
        self.row_at(0).is_some_and(|row| row.pinned && row.id == id)
    }

    fn is_first_unpinned(&self, id: RowId) -> bool {
        self.row_at(self.pinned_count())
            .is_some_and(|row| !row.pinned && row.id == id)
    }

    /// Row ids in current order.
    fn ids(&self) -> Vec<RowId> {
        (0..self.row_count())
            .filter_map(|position| self.row_at(position))
            .map(|row| row.id)
            .collect()
    }
}

/// Ordered in-memory rows with a pinned prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowIndex {
    rows: Vec<Row>,
}

impl RowIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from rows in display order.
    ///
    /// Pinned rows are moved ahead of unpinned rows, keeping relative order.
    ///
    /// # Errors
    /// - Returns `DuplicateRow` when an id appears twice.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> RowIndexResult<Self> {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();
        for row in rows {
            if !seen.insert(row.id) {
                return Err(RowIndexError::DuplicateRow(row.id));
            }
            collected.push(row);
        }
        let mut index = Self { rows: collected };
        index.repartition();
        Ok(index)
    }

    /// Rows in current order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inserts one row, clamping the position into the row's partition.
    ///
    /// Returns the position the row landed at.
    pub fn insert(&mut self, row: Row, position: usize) -> RowIndexResult<usize> {
        if self.position_of(row.id).is_some() {
            return Err(RowIndexError::DuplicateRow(row.id));
        }
        let boundary = self.pinned_count();
        let target = if row.pinned {
            position.min(boundary)
        } else {
            position.clamp(boundary, self.rows.len())
        };
        self.rows.insert(target, row);
        Ok(target)
    }

    /// Appends one row at the end of its partition.
    pub fn push(&mut self, row: Row) -> RowIndexResult<usize> {
        self.insert(row, self.rows.len())
    }

    /// Removes one row by id.
    pub fn remove(&mut self, id: RowId) -> RowIndexResult<Row> {
        let position = self
            .position_of(id)
            .ok_or(RowIndexError::RowNotFound(id))?;
        Ok(self.rows.remove(position))
    }

    /// Flips the pinned flag; the row moves to the partition boundary.
    pub fn set_pinned(&mut self, id: RowId, pinned: bool) -> RowIndexResult<()> {
        let position = self
            .position_of(id)
            .ok_or(RowIndexError::RowNotFound(id))?;
        self.rows[position].pinned = pinned;
        self.repartition();
        Ok(())
    }

    pub fn set_interactive(&mut self, id: RowId, has_interactive_content: bool) -> RowIndexResult<()> {
        let position = self
            .position_of(id)
            .ok_or(RowIndexError::RowNotFound(id))?;
        self.rows[position].has_interactive_content = has_interactive_content;
        Ok(())
    }

    fn repartition(&mut self) {
        let (pinned, unpinned): (Vec<Row>, Vec<Row>) =
            self.rows.iter().copied().partition(|row| row.pinned);
        self.rows = pinned;
        self.rows.extend(unpinned);
    }
}

impl RowSource for RowIndex {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_at(&self, position: usize) -> Option<Row> {
        self.rows.get(position).copied()
    }

    fn position_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    fn pinned_count(&self) -> usize {
        self.rows.iter().take_while(|row| row.pinned).count()
    }

    fn reorder(&mut self, ids: &[RowId], new_position: usize) -> RowIndexResult<()> {
        if ids.is_empty() {
            return Err(RowIndexError::EmptyMove);
        }
        let mut moving = HashSet::new();
        for id in ids {
            if self.position_of(*id).is_none() {
                return Err(RowIndexError::RowNotFound(*id));
            }
            if !moving.insert(*id) {
                return Err(RowIndexError::DuplicateRow(*id));
            }
        }

        let (block, mut remaining): (Vec<Row>, Vec<Row>) = self
            .rows
            .iter()
            .copied()
            .partition(|row| moving.contains(&row.id));
        let target = new_position.min(remaining.len());
        remaining.splice(target..target, block);
        self.rows = remaining;
        self.repartition();
        Ok(())
    }

    fn delete_at(&mut self, position: usize) -> RowIndexResult<Row> {
        if position >= self.rows.len() {
            return Err(RowIndexError::PositionOutOfRange {
                position,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(position))
    }
}
