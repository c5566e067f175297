//! List view façade.
//!
//! # Responsibility
//! - Route raw pointer, scroll, model-change and animation notifications to
//!   the overlay, selection, animation and drag controllers.
//! - Emit intent events toward the external store, animator and shell.
//!
//! # Invariants
//! - Each pointer gesture emits `NotePressed` and `SelectionChanged` at most
//!   once; window/overlay changes never emit selection events.
//! - Structural row removal happens only from animation completion (or
//!   immediately when animations are disabled).
//! - Intents carry only rows the row source still resolves.

use crate::config::ListViewConfig;
use crate::model::event::{EventSink, ListEvent};
use crate::model::row::{FolderId, Row, RowId, TagId};
use crate::model::transition::TransitionState;
use crate::repo::row_index::RowSource;
use crate::service::context_actions::{ContextActionPlan, NoteCatalog, ViewContext};
use crate::view::animation::{AnimationStateMachine, TransitionBatch};
use crate::view::drag::{DragMoveOutcome, DragPreview, DragReorderController, DropOutcome, DropPosition};
use crate::view::layout::{Point, RowLayout, Viewport};
use crate::view::overlay::{OverlayWindowManager, RowOverlayHost};
use crate::view::selection::{SelectionChange, SelectionController};
use log::{debug, info};

/// Pointer button of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Raw pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    /// Selection-extending modifier (ctrl/cmd) held.
    pub ctrl: bool,
}

impl PointerEvent {
    pub fn primary(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            ctrl: false,
        }
    }

    pub fn secondary(x: f32, y: f32) -> Self {
        Self {
            button: PointerButton::Secondary,
            ..Self::primary(x, y)
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    row: RowId,
    start: Point,
    content_press: Point,
    dragged: bool,
    /// Press was used by the collapse toggle.
    consumed: bool,
}

/// Controller core of one note list view.
///
/// Owns the row source, overlay host and event sink it is wired to; the
/// shell feeds input through the `pointer_*`, `on_*` and `request_*` calls.
pub struct ListViewController<S, O: RowOverlayHost, E> {
    config: ListViewConfig,
    source: S,
    host: O,
    sink: E,
    overlays: OverlayWindowManager<O::Handle>,
    selection: SelectionController,
    animation: AnimationStateMachine,
    drag: DragReorderController,
    pinned_collapsed: bool,
    current_row_active: bool,
    viewport: Viewport,
    view: ViewContext,
    gesture: Option<Gesture>,
}

impl<S, O, E> ListViewController<S, O, E>
where
    S: RowSource,
    O: RowOverlayHost,
    E: EventSink,
{
    pub fn new(config: ListViewConfig, source: S, host: O, sink: E) -> Self {
        Self {
            animation: AnimationStateMachine::new(config.animation_enabled),
            config,
            source,
            host,
            sink,
            overlays: OverlayWindowManager::new(),
            selection: SelectionController::new(),
            drag: DragReorderController::new(),
            pinned_collapsed: false,
            current_row_active: false,
            viewport: Viewport::default(),
            view: ViewContext::default(),
            gesture: None,
        }
    }

    pub fn config(&self) -> &ListViewConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Store-side access; follow structural changes with the matching
    /// `on_*` notification.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn host(&self) -> &O {
        &self.host
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    pub fn overlays(&self) -> &OverlayWindowManager<O::Handle> {
        &self.overlays
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn animation(&self) -> &AnimationStateMachine {
        &self.animation
    }

    pub fn drag(&self) -> &DragReorderController {
        &self.drag
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_pinned_collapsed(&self) -> bool {
        self.pinned_collapsed
    }

    /// Whether the current row is drawn with the focused highlight.
    pub fn is_current_row_active(&self) -> bool {
        self.current_row_active
    }

    pub fn view_context(&self) -> &ViewContext {
        &self.view
    }

    pub fn set_view_context(&mut self, view: ViewContext) {
        self.view = view;
    }

    /// Geometry of the current ordering.
    pub fn layout(&self) -> RowLayout {
        RowLayout::build(&self.source, &self.config, self.pinned_collapsed)
    }

    // Pointer input.

    pub fn pointer_press(&mut self, event: PointerEvent) {
        if self.drag.is_active() {
            return;
        }
        self.gesture = None;
        let content = self.viewport.to_content(event.position);
        let layout = self.layout();
        let Some(rect) = layout.hit_test(content.y).copied() else {
            debug!("event=pointer_press module=list_view status=ok target=empty");
            self.sink.emit(ListEvent::ListClicked);
            return;
        };

        if event.button == PointerButton::Secondary {
            if rect.laid_out {
                if let Some(change) = self.selection.secondary_press(rect.id) {
                    self.emit_selection(change);
                }
            }
            return;
        }

        if self.source.is_first_pinned(rect.id)
            && layout.hits_collapse_icon(&rect, content, &self.viewport, &self.config)
        {
            self.set_pinned_collapsed(!self.pinned_collapsed);
            self.selection.consume_press();
            self.gesture = Some(Gesture {
                row: rect.id,
                start: event.position,
                content_press: content,
                dragged: false,
                consumed: true,
            });
            return;
        }
        if !rect.laid_out {
            return;
        }

        self.gesture = Some(Gesture {
            row: rect.id,
            start: event.position,
            content_press: content,
            dragged: false,
            consumed: false,
        });
        if let Some(change) = self.selection.primary_press(rect.id, event.ctrl) {
            self.emit_selection(change);
        }
    }

    /// Pointer motion with the primary button held.
    ///
    /// Starts a drag of the selection once the pointer travelled
    /// `start_drag_distance`; returns the drag image plan at that moment.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Option<DragPreview<O::Handle>> {
        let gesture = self.gesture.as_mut()?;
        if gesture.consumed || gesture.dragged {
            return None;
        }
        if gesture.start.manhattan_distance(event.position) < self.config.start_drag_distance {
            return None;
        }
        gesture.dragged = true;
        let press = gesture.content_press;
        let pressed_row = gesture.row;
        self.selection.end_gesture();

        let mut rows = self.selected_rows();
        if rows.is_empty() {
            rows.push(pressed_row);
        }
        let layout = self.layout();
        self.drag.begin(
            &rows,
            press,
            &layout,
            &self.source,
            &mut self.overlays,
            &mut self.host,
        )
    }

    /// Pointer release; a release that is not a drop acts on the row under
    /// the pointer and does nothing over empty space.
    pub fn pointer_release(&mut self, event: PointerEvent) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        if gesture.consumed {
            self.selection.end_gesture();
            return;
        }
        if gesture.dragged {
            if self.drag.is_active() {
                self.drop_at(event.position);
            }
            return;
        }
        let content = self.viewport.to_content(event.position);
        let layout = self.layout();
        let Some(row) = layout
            .hit_test(content.y)
            .filter(|rect| rect.laid_out)
            .map(|rect| rect.id)
        else {
            debug!("event=pointer_release module=list_view status=ok target=empty");
            self.selection.end_gesture();
            return;
        };
        if let Some(change) = self.selection.release_without_drag(row, event.ctrl) {
            self.emit_selection(change);
        }
    }

    // Drag protocol.

    /// Row and indicator position under a viewport point.
    pub fn drop_target(&self, position: Point) -> Option<(RowId, DropPosition)> {
        let content = self.viewport.to_content(position);
        let layout = self.layout();
        let rect = layout.hit_test(content.y)?;
        Some((rect.id, layout.drop_position(rect, content.y)))
    }

    pub fn drag_over(&mut self, position: Point) -> DragMoveOutcome {
        let target = self.drop_target(position).map(|(id, _)| id);
        self.drag
            .drag_move(target, &self.source, self.pinned_collapsed)
    }

    pub fn drop_at(&mut self, position: Point) -> DropOutcome {
        let target = self.drop_target(position);
        let outcome = self.drag.drop(
            target,
            &mut self.source,
            &mut self.overlays,
            &mut self.host,
            &self.config,
            self.pinned_collapsed,
        );
        self.gesture = None;
        self.selection.end_gesture();
        self.rescan_overlays();

        if let DropOutcome::Moved { rows, destination } = &outcome {
            let out = self.animation.mark_move_out(rows);
            self.emit_transition(out);
            let moved_in = self.animation.mark_move_in(rows);
            self.emit_transition(moved_in);
            self.sink.emit(ListEvent::RowsReordered {
                rows: rows.clone(),
                destination: *destination,
            });
        }
        outcome
    }

    /// Cancels a running drag; returns `false` when none was running.
    pub fn cancel_drag(&mut self) -> bool {
        self.gesture = None;
        self.selection.end_gesture();
        let cancelled = self.drag.cancel(
            &self.source,
            &mut self.overlays,
            &mut self.host,
            &self.config,
            self.pinned_collapsed,
        );
        if cancelled {
            self.rescan_overlays();
        }
        cancelled
    }

    // Scroll and model notifications.

    pub fn on_scroll(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        // Overlays stay closed while dragging; the drag exit path rescans.
        if self.drag.is_active() {
            return;
        }
        let layout = self.layout();
        self.overlays
            .on_scroll(viewport, &layout, &self.source, &mut self.host);
    }

    /// The store inserted rows.
    pub fn on_rows_inserted(&mut self, rows: &[RowId]) {
        let batch = self.animation.mark_inserted(rows);
        self.emit_transition(batch);
        self.rescan_overlays();
    }

    /// The store asks for rows to be removed once their transition ends.
    pub fn on_remove_rows_requested(&mut self, rows: &[RowId]) {
        let request = self
            .animation
            .mark_remove_requested(rows, &mut self.source);
        self.emit_transition(request.batch);
        if !request.removed.is_empty() {
            self.after_removal();
        }
    }

    pub fn rows_about_to_be_moved(&mut self, rows: &[RowId]) {
        let batch = self.animation.mark_move_out(rows);
        self.emit_transition(batch);
    }

    pub fn rows_moved(&mut self, rows: &[RowId]) {
        let batch = self.animation.mark_move_in(rows);
        self.emit_transition(batch);
        self.rescan_overlays();
    }

    /// The animator finished every row under `state`; returns deleted rows.
    pub fn on_animation_finished(&mut self, state: TransitionState) -> Vec<RowId> {
        let removed = self
            .animation
            .on_animation_finished(state, &mut self.source);
        if !removed.is_empty() {
            self.after_removal();
        }
        removed
    }

    /// The animator finished one row.
    pub fn on_row_animation_finished(&mut self, row: RowId, state: TransitionState) -> bool {
        let removed = self
            .animation
            .on_row_animation_finished(row, state, &mut self.source);
        if removed {
            self.after_removal();
        }
        removed
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.config.animation_enabled = enabled;
        self.animation.set_enabled(enabled);
    }

    pub fn set_pinned_collapsed(&mut self, collapsed: bool) {
        if self.pinned_collapsed == collapsed {
            return;
        }
        self.pinned_collapsed = collapsed;
        debug!("event=pinned_collapse module=list_view status=ok collapsed={collapsed}");
        self.sink
            .emit(ListEvent::PinnedCollapseChanged { collapsed });
        self.rescan_overlays();
    }

    /// Programmatically makes `row` the single selected row.
    pub fn set_current_row(&mut self, row: RowId) -> bool {
        if self.source.position_of(row).is_none() {
            return false;
        }
        if !self.selection.set_current(row) {
            return false;
        }
        self.sink.emit(ListEvent::SelectionChanged { rows: vec![row] });
        true
    }

    /// Switches the focused highlight of the current row; the shell repaints
    /// the row carried by the emitted event.
    pub fn set_current_row_active(&mut self, active: bool) {
        if self.current_row_active == active {
            return;
        }
        self.current_row_active = active;
        let row = self.selection.current();
        debug!("event=current_row_active module=list_view status=ok active={active}");
        self.sink
            .emit(ListEvent::CurrentRowActiveChanged { row, active });
    }

    pub fn attach_overlay_handle(&mut self, row: RowId, handle: O::Handle) -> bool {
        self.overlays.attach_handle(row, handle)
    }

    pub fn detach_overlay_handle(&mut self, row: RowId, handle: &O::Handle) -> bool {
        self.overlays.detach_handle(row, handle)
    }

    // Context actions and intents.

    /// Selected rows the source still resolves, in selection order.
    pub fn selected_rows(&self) -> Vec<RowId> {
        self.selection
            .selected()
            .iter()
            .copied()
            .filter(|id| self.source.position_of(*id).is_some())
            .collect()
    }

    /// Intents to offer for the current selection.
    pub fn context_actions(&self, catalog: &impl NoteCatalog) -> Option<ContextActionPlan> {
        let rows: Vec<Row> = self
            .selection
            .selected()
            .iter()
            .filter_map(|id| self.source.row(*id))
            .collect();
        ContextActionPlan::build(&rows, &self.view, catalog)
    }

    pub fn request_delete(&mut self) -> bool {
        self.emit_for_selection(|rows| ListEvent::DeleteRequested { rows })
    }

    pub fn request_restore(&mut self) -> bool {
        self.emit_for_selection(|rows| ListEvent::RestoreRequested { rows })
    }

    pub fn request_set_pinned(&mut self, pinned: bool) -> bool {
        self.emit_for_selection(|rows| ListEvent::SetPinnedRequested { rows, pinned })
    }

    pub fn request_add_tag(&mut self, tag: TagId) -> bool {
        self.emit_per_row(|row| ListEvent::AddTagRequested { row, tag })
    }

    pub fn request_remove_tag(&mut self, tag: TagId) -> bool {
        self.emit_per_row(|row| ListEvent::RemoveTagRequested { row, tag })
    }

    pub fn request_move_to_folder(&mut self, folder: FolderId) -> bool {
        if self.view.current_folder == Some(folder) {
            return false;
        }
        self.emit_per_row(|row| ListEvent::MoveRequested { row, folder })
    }

    pub fn request_new_note(&mut self) {
        self.sink.emit(ListEvent::NewNoteRequested);
    }

    /// Ends any drag and closes every overlay before the view goes away.
    pub fn teardown(&mut self) {
        self.cancel_drag();
        self.overlays.close_all(&mut self.host);
        info!(
            "event=list_view_teardown module=list_view status=ok rows={}",
            self.source.row_count()
        );
    }

    fn emit_selection(&mut self, change: SelectionChange) {
        self.sink.emit(ListEvent::NotePressed {
            rows: change.pressed,
        });
        self.sink.emit(ListEvent::SelectionChanged {
            rows: change.selection,
        });
    }

    fn emit_transition(&mut self, batch: TransitionBatch) {
        if batch.is_empty() || batch.state == TransitionState::Normal {
            return;
        }
        self.sink.emit(ListEvent::TransitionStarted {
            state: batch.state,
            rows: batch.rows,
        });
    }

    fn emit_for_selection(&mut self, event: impl FnOnce(Vec<RowId>) -> ListEvent) -> bool {
        let rows = self.selected_rows();
        if rows.is_empty() {
            return false;
        }
        self.sink.emit(event(rows));
        true
    }

    fn emit_per_row(&mut self, event: impl Fn(RowId) -> ListEvent) -> bool {
        let rows = self.selected_rows();
        for row in &rows {
            self.sink.emit(event(*row));
        }
        !rows.is_empty()
    }

    fn after_removal(&mut self) {
        let source = &self.source;
        if self
            .selection
            .retain_existing(|id| source.position_of(id).is_some())
        {
            self.sink.emit(ListEvent::SelectionChanged {
                rows: self.selection.selected().to_vec(),
            });
        }
        self.rescan_overlays();
    }

    /// Re-runs the windowing scan against the current viewport.
    fn rescan_overlays(&mut self) {
        if self.drag.is_active() || self.overlays.last_viewport().is_none() {
            return;
        }
        let layout = self.layout();
        self.overlays
            .on_scroll(self.viewport, &layout, &self.source, &mut self.host);
    }
}

#[cfg(test)]
mod tests {
    use super::{ListViewController, PointerEvent};
    use crate::config::ListViewConfig;
    use crate::model::event::ListEvent;
    use crate::model::row::{Row, RowId, RowKind};
    use crate::model::transition::TransitionState;
    use crate::repo::row_index::{RowIndex, RowSource};
    use crate::view::layout::{Point, Viewport};
    use crate::view::overlay::RowOverlayHost;

    #[derive(Default)]
    struct NullHost;

    impl RowOverlayHost for NullHost {
        type Handle = ();

        fn create_overlay(&mut self, _row: RowId, _kind: RowKind) -> Option<()> {
            Some(())
        }

        fn destroy_overlay(&mut self, _row: RowId, _handles: Vec<()>) {}
    }

    type Controller = ListViewController<RowIndex, NullHost, Vec<ListEvent>>;

    fn controller(rows: impl IntoIterator<Item = Row>) -> Controller {
        let index = RowIndex::from_rows(rows).expect("unique rows");
        let mut controller =
            ListViewController::new(ListViewConfig::default(), index, NullHost, Vec::new());
        controller.on_scroll(Viewport::new(0.0, 300.0, 400.0));
        controller
    }

    fn row_y(position: usize) -> f32 {
        position as f32 * 38.0 + 10.0
    }

    #[test]
    fn click_emits_pressed_and_selection_once() {
        let mut list = controller((1..=3).map(Row::new));
        list.pointer_press(PointerEvent::primary(50.0, row_y(1)));
        list.pointer_release(PointerEvent::primary(50.0, row_y(1)));
        assert_eq!(
            list.sink(),
            &vec![
                ListEvent::NotePressed { rows: vec![2] },
                ListEvent::SelectionChanged { rows: vec![2] },
            ]
        );
    }

    #[test]
    fn press_on_empty_space_reports_list_click() {
        let mut list = controller([Row::new(1)]);
        list.pointer_press(PointerEvent::primary(50.0, 300.0));
        assert_eq!(list.sink(), &vec![ListEvent::ListClicked]);
        assert!(list.selection().is_empty());
    }

    #[test]
    fn collapse_icon_toggles_pinned_section() {
        let mut list = controller([Row::pinned(1), Row::new(2)]);
        list.pointer_press(PointerEvent::primary(285.0, 10.0));
        list.pointer_release(PointerEvent::primary(285.0, 10.0));
        assert!(list.is_pinned_collapsed());
        assert!(list.selection().is_empty());
        assert_eq!(
            list.sink(),
            &vec![ListEvent::PinnedCollapseChanged { collapsed: true }]
        );
    }

    #[test]
    fn dragging_past_threshold_reorders_on_release() {
        let mut list = controller((1..=4).map(Row::new));
        list.pointer_press(PointerEvent::primary(50.0, row_y(0)));
        assert!(list
            .pointer_move(PointerEvent::primary(50.0, row_y(0) + 4.0))
            .is_none());
        assert!(list
            .pointer_move(PointerEvent::primary(50.0, row_y(0) + 12.0))
            .is_some());
        list.pointer_release(PointerEvent::primary(50.0, row_y(3) + 25.0));

        assert_eq!(list.source().ids(), vec![2, 3, 4, 1]);
        assert!(list.sink().contains(&ListEvent::RowsReordered {
            rows: vec![1],
            destination: 3
        }));
        assert!(!list.drag().is_active());
    }

    #[test]
    fn removal_is_deferred_until_animation_finishes() {
        let mut list = controller((1..=3).map(Row::new));
        list.set_current_row(2);
        list.on_remove_rows_requested(&[2]);
        assert_eq!(list.source().row_count(), 3);

        assert_eq!(list.on_animation_finished(TransitionState::Remove), vec![2]);
        assert_eq!(list.source().ids(), vec![1, 3]);
        assert!(list.selection().is_empty());
        assert_eq!(
            list.sink().last(),
            Some(&ListEvent::SelectionChanged { rows: vec![] })
        );
    }

    #[test]
    fn intents_cover_current_selection() {
        let mut list = controller((1..=3).map(Row::new));
        list.pointer_press(PointerEvent::primary(50.0, row_y(0)));
        list.pointer_press(PointerEvent::primary(50.0, row_y(2)).with_ctrl());
        list.sink_mut().clear();

        assert!(list.request_add_tag(9));
        assert!(list.request_delete());
        assert_eq!(
            list.sink(),
            &vec![
                ListEvent::AddTagRequested { row: 1, tag: 9 },
                ListEvent::AddTagRequested { row: 3, tag: 9 },
                ListEvent::DeleteRequested { rows: vec![1, 3] },
            ]
        );
    }

    #[test]
    fn stray_press_during_drag_keeps_release_as_drop() {
        let mut list = controller((1..=4).map(Row::new));
        list.pointer_press(PointerEvent::primary(50.0, row_y(0)));
        assert!(list
            .pointer_move(PointerEvent::primary(50.0, row_y(0) + 12.0))
            .is_some());

        list.pointer_press(PointerEvent::primary(50.0, row_y(2)));
        assert!(list.drag().is_active());
        list.pointer_release(PointerEvent::primary(50.0, row_y(3) + 25.0));

        assert!(!list.drag().is_active());
        assert_eq!(list.source().ids(), vec![2, 3, 4, 1]);
    }

    #[test]
    fn current_row_highlight_follows_focus() {
        let mut list = controller((1..=3).map(Row::new));
        assert!(!list.is_current_row_active());
        list.set_current_row(2);
        list.sink_mut().clear();

        list.set_current_row_active(true);
        list.set_current_row_active(true);
        assert!(list.is_current_row_active());
        list.set_current_row_active(false);
        assert_eq!(
            list.sink(),
            &vec![
                ListEvent::CurrentRowActiveChanged {
                    row: Some(2),
                    active: true
                },
                ListEvent::CurrentRowActiveChanged {
                    row: Some(2),
                    active: false
                },
            ]
        );
        assert_eq!(list.selection().selected(), &[2]);
    }

    #[test]
    fn drop_target_resolves_indicator_side() {
        let list = controller((1..=2).map(Row::new));
        assert_eq!(
            list.drop_target(Point::new(10.0, 5.0)),
            Some((1, crate::view::drag::DropPosition::Above))
        );
        assert_eq!(
            list.drop_target(Point::new(10.0, 30.0)),
            Some((1, crate::view::drag::DropPosition::Below))
        );
    }
}
