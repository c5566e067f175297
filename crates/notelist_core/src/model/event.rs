//! Outbound intent events emitted by the list core.
//!
//! # Responsibility
//! - Describe everything external collaborators (store, tag pool, animator,
//!   persistence of the selected notes) must react to.
//! - Provide the `EventSink` seam the façade writes into.
//!
//! # Invariants
//! - Row lists preserve the order in which the core resolved them.
//! - Emission is synchronous; sinks must not call back into the controller.

use crate::model::row::{FolderId, RowId, TagId};
use crate::model::transition::TransitionState;
use serde::{Deserialize, Serialize};

/// One event emitted toward external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEvent {
    /// Full selection after a gesture or programmatic change.
    SelectionChanged { rows: Vec<RowId> },
    /// Rows a press/release gesture resolved to (open the note).
    NotePressed { rows: Vec<RowId> },
    /// Press landed on empty list space.
    ListClicked,
    DeleteRequested { rows: Vec<RowId> },
    RestoreRequested { rows: Vec<RowId> },
    SetPinnedRequested { rows: Vec<RowId>, pinned: bool },
    AddTagRequested { row: RowId, tag: TagId },
    RemoveTagRequested { row: RowId, tag: TagId },
    MoveRequested { row: RowId, folder: FolderId },
    NewNoteRequested,
    PinnedCollapseChanged { collapsed: bool },
    /// Focus highlight of the current row changed; `row` needs a repaint.
    CurrentRowActiveChanged { row: Option<RowId>, active: bool },
    /// A drop committed a new ordering; `destination` is the first row's
    /// position after the move.
    RowsReordered { rows: Vec<RowId>, destination: usize },
    /// Rows entered a visual transition the external animator should play.
    TransitionStarted {
        state: TransitionState,
        rows: Vec<RowId>,
    },
}

/// Receiver of `ListEvent`s.
pub trait EventSink {
    fn emit(&mut self, event: ListEvent);
}

impl EventSink for Vec<ListEvent> {
    fn emit(&mut self, event: ListEvent) {
        self.push(event);
    }
}
