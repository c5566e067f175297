//! Click, ctrl-click and right-click selection semantics.
//!
//! # Responsibility
//! - Own the selection set, the current row and the selection mode.
//! - Turn press/release gestures into at most one selection change each.
//!
//! # Invariants
//! - Single mode holds at most one selected row.
//! - When the selection is non-empty, `current` is one of its members.
//! - A press that mutated the selection suppresses the matching release;
//!   a press on an already-selected row defers its effect to the release.

use crate::model::row::RowId;
use log::debug;

/// Selection mode of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// Outcome of one selection gesture step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// Rows the gesture resolved to.
    pub pressed: Vec<RowId>,
    /// Full selection after the gesture.
    pub selection: Vec<RowId>,
}

/// Selection state machine driven by pointer gestures.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Vec<RowId>,
    current: Option<RowId>,
    mode: SelectionMode,
    press_handled: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected rows in selection order.
    pub fn selected(&self) -> &[RowId] {
        &self.selected
    }

    pub fn current(&self) -> Option<RowId> {
        self.current
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Primary-button press on one row.
    ///
    /// With `extend` (ctrl held) an unselected row joins the selection in
    /// multi mode; without it the selection collapses to the row. A press on
    /// an already-selected row changes nothing until release, so a drag can
    /// start from an existing multi-selection.
    pub fn primary_press(&mut self, id: RowId, extend: bool) -> Option<SelectionChange> {
        if self.contains(id) {
            self.press_handled = false;
            return None;
        }

        self.press_handled = true;
        if extend {
            self.mode = SelectionMode::Multi;
            self.current = Some(id);
            self.selected.push(id);
            debug!(
                "event=selection_press module=selection status=ok mode=multi row={id} size={}",
                self.selected.len()
            );
            return Some(SelectionChange {
                pressed: self.selected.clone(),
                selection: self.selected.clone(),
            });
        }

        self.collapse_to(id);
        debug!("event=selection_press module=selection status=ok mode=single row={id}");
        Some(SelectionChange {
            pressed: vec![id],
            selection: vec![id],
        })
    }

    /// Primary-button release that did not turn into a drag.
    ///
    /// Acts only when the press left the selection untouched. With `extend`
    /// a row that is one of several selected rows is deselected; otherwise
    /// the selection collapses to the row.
    pub fn release_without_drag(&mut self, id: RowId, extend: bool) -> Option<SelectionChange> {
        if std::mem::take(&mut self.press_handled) {
            return None;
        }

        if extend {
            self.mode = SelectionMode::Multi;
            if self.contains(id) && self.selected.len() > 1 {
                self.selected.retain(|selected| *selected != id);
                if self.current == Some(id) {
                    self.current = self.selected.last().copied();
                }
            } else {
                self.selected = vec![id];
                self.current = Some(id);
            }
            debug!(
                "event=selection_release module=selection status=ok mode=multi row={id} size={}",
                self.selected.len()
            );
            return Some(SelectionChange {
                pressed: self.selected.clone(),
                selection: self.selected.clone(),
            });
        }

        self.collapse_to(id);
        debug!("event=selection_release module=selection status=ok mode=single row={id}");
        Some(SelectionChange {
            pressed: vec![id],
            selection: vec![id],
        })
    }

    /// Secondary-button press (context menu).
    ///
    /// Keeps a multi-selection that already contains the row; otherwise the
    /// selection collapses to it.
    pub fn secondary_press(&mut self, id: RowId) -> Option<SelectionChange> {
        if self.contains(id) {
            return None;
        }
        self.collapse_to(id);
        Some(SelectionChange {
            pressed: vec![id],
            selection: vec![id],
        })
    }

    /// Marks the running press as consumed by something other than selection.
    pub fn consume_press(&mut self) {
        self.press_handled = true;
    }

    /// Ends the running gesture without a release effect (drag, cancel).
    pub fn end_gesture(&mut self) {
        self.press_handled = false;
    }

    /// Programmatic current row; returns whether the selection changed.
    pub fn set_current(&mut self, id: RowId) -> bool {
        let changed = self.selected != [id] || self.mode != SelectionMode::Single;
        self.collapse_to(id);
        changed
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.current = None;
        self.mode = SelectionMode::Single;
    }

    /// Drops selected rows that no longer exist; returns whether any were dropped.
    pub fn retain_existing(&mut self, exists: impl Fn(RowId) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| exists(*id));
        if self.current.is_some_and(|id| !self.selected.contains(&id)) {
            self.current = self.selected.last().copied();
        }
        before != self.selected.len()
    }

    fn collapse_to(&mut self, id: RowId) {
        self.mode = SelectionMode::Single;
        self.selected = vec![id];
        self.current = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionController, SelectionMode};

    #[test]
    fn plain_click_collapses_selection() {
        let mut selection = SelectionController::new();
        let change = selection.primary_press(3, false).expect("press selects");
        assert_eq!(change.selection, vec![3]);
        assert_eq!(selection.current(), Some(3));
        assert_eq!(selection.mode(), SelectionMode::Single);
        assert!(selection.release_without_drag(3, false).is_none());
    }

    #[test]
    fn ctrl_click_toggles_through_release() {
        let mut selection = SelectionController::new();
        selection.primary_press(3, false);
        selection.release_without_drag(3, false);

        let change = selection.primary_press(5, true).expect("ctrl press adds");
        assert_eq!(change.selection, vec![3, 5]);
        assert_eq!(selection.mode(), SelectionMode::Multi);
        assert!(selection.release_without_drag(5, true).is_none());

        assert!(selection.primary_press(3, true).is_none());
        let change = selection
            .release_without_drag(3, true)
            .expect("release deselects");
        assert_eq!(change.selection, vec![5]);
        assert_eq!(selection.current(), Some(5));
    }

    #[test]
    fn ctrl_release_on_sole_selected_row_keeps_it() {
        let mut selection = SelectionController::new();
        selection.primary_press(2, true);
        selection.release_without_drag(2, true);
        assert!(selection.primary_press(2, true).is_none());
        let change = selection.release_without_drag(2, true).expect("release");
        assert_eq!(change.selection, vec![2]);
    }

    #[test]
    fn plain_release_on_member_collapses_multi_selection() {
        let mut selection = SelectionController::new();
        selection.primary_press(1, true);
        selection.primary_press(2, true);
        assert!(selection.primary_press(1, false).is_none());
        let change = selection.release_without_drag(1, false).expect("release");
        assert_eq!(change.selection, vec![1]);
        assert_eq!(selection.mode(), SelectionMode::Single);
    }

    #[test]
    fn secondary_press_preserves_containing_selection() {
        let mut selection = SelectionController::new();
        selection.primary_press(1, true);
        selection.primary_press(2, true);
        assert!(selection.secondary_press(2).is_none());
        assert_eq!(selection.selected(), &[1, 2]);

        let change = selection.secondary_press(7).expect("collapses");
        assert_eq!(change.selection, vec![7]);
    }

    #[test]
    fn retain_existing_repairs_current() {
        let mut selection = SelectionController::new();
        selection.primary_press(1, true);
        selection.primary_press(2, true);
        assert!(selection.retain_existing(|id| id != 2));
        assert_eq!(selection.selected(), &[1]);
        assert_eq!(selection.current(), Some(1));
    }

    #[test]
    fn set_current_reports_change_once() {
        let mut selection = SelectionController::new();
        assert!(selection.set_current(4));
        assert!(!selection.set_current(4));
    }
}
