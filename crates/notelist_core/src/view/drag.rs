//! Drag-and-drop reorder gesture.
//!
//! # Responsibility
//! - Own the drag session between drag start and drop/cancel.
//! - Enforce the pinned partition rule and the collapsed-section rule.
//! - Commit accepted drops to the row source as one contiguous block.
//!
//! # Invariants
//! - At most one session exists; every exit path discards it.
//! - Overlays are closed for the whole gesture and the pre-drag active set
//!   is reopened on every exit path.
//! - Rejected, ignored and cancelled drops never mutate the row source.

use crate::config::ListViewConfig;
use crate::model::row::RowId;
use crate::repo::row_index::RowSource;
use crate::view::layout::{Point, RowLayout};
use crate::view::overlay::{OverlayWindowManager, RowOverlayHost};
use log::{debug, info, warn};

/// Drop indicator position relative to the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Above,
    Below,
    /// Dropped onto the row itself; lands like `Above`.
    On,
}

/// What the drag image is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPreviewSource<H> {
    /// Live overlay of the single dragged row.
    Overlay(H),
    /// Statically rendered row; used when no overlay handle exists.
    Rendered,
    /// Badge showing how many rows are dragged.
    Badge { count: usize },
}

/// Drag image plan handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview<H> {
    pub source: DragPreviewSource<H>,
    /// Pointer position inside the drag image.
    pub hotspot: Point,
    /// Crop the section header strip off the top of the row image.
    pub trim_section_header: bool,
}

/// Result of hovering over a potential drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMoveOutcome {
    Accepted { inside_pinned: bool },
    Ignored,
}

/// Result of releasing the drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Rows were moved; `rows` in their new order, `destination` is the
    /// position of the first of them.
    Moved { rows: Vec<RowId>, destination: usize },
    /// Target violates the partition or collapsed-section rule.
    Rejected,
    /// No usable target; the gesture ended without a change.
    Cancelled,
}

/// State of one running drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    rows: Vec<RowId>,
    includes_pinned: bool,
    inside_pinned: bool,
    pointer_offset: Point,
    overlay_snapshot: Vec<RowId>,
}

impl DragSession {
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn includes_pinned(&self) -> bool {
        self.includes_pinned
    }

    /// Whether the last accepted target sits in the pinned partition.
    pub fn inside_pinned(&self) -> bool {
        self.inside_pinned
    }

    pub fn pointer_offset(&self) -> Point {
        self.pointer_offset
    }

    /// Overlay-active rows at drag start.
    pub fn overlay_snapshot(&self) -> &[RowId] {
        &self.overlay_snapshot
    }

    fn accepts(&self, target: RowId, source: &impl RowSource, pinned_collapsed: bool) -> Option<bool> {
        let row = source.row(target)?;
        if pinned_collapsed && row.pinned {
            return None;
        }
        if !self.includes_pinned && row.pinned {
            return None;
        }
        Some(row.pinned)
    }
}

/// Drag gesture controller.
#[derive(Debug, Clone, Default)]
pub struct DragReorderController {
    session: Option<DragSession>,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Starts a drag of `rows` pressed at `press` (content coordinates).
    ///
    /// Plans the drag image while overlays are still open, snapshots the
    /// active overlay set and closes every overlay. Returns `None` when a
    /// drag is already running or no row resolves.
    pub fn begin<H, O>(
        &mut self,
        rows: &[RowId],
        press: Point,
        layout: &RowLayout,
        source: &impl RowSource,
        overlays: &mut OverlayWindowManager<H>,
        host: &mut O,
    ) -> Option<DragPreview<H>>
    where
        H: Clone + PartialEq,
        O: RowOverlayHost<Handle = H>,
    {
        if self.session.is_some() {
            warn!("event=drag_begin module=drag status=ignored reason=already_dragging");
            return None;
        }
        let rows: Vec<RowId> = rows
            .iter()
            .copied()
            .filter(|id| source.position_of(*id).is_some())
            .collect();
        if rows.is_empty() {
            debug!("event=drag_begin module=drag status=ignored reason=no_rows");
            return None;
        }

        let preview = plan_preview(&rows, press, layout, source, overlays);
        let overlay_snapshot = overlays.active_ids();
        overlays.close_all(host);

        let includes_pinned = rows.iter().any(|id| source.is_pinned(*id));
        debug!(
            "event=drag_begin module=drag status=ok rows={} includes_pinned={includes_pinned} overlays={}",
            rows.len(),
            overlay_snapshot.len()
        );
        self.session = Some(DragSession {
            rows,
            includes_pinned,
            inside_pinned: false,
            pointer_offset: preview.hotspot,
            overlay_snapshot,
        });
        Some(preview)
    }

    /// Evaluates a hover over `target`.
    pub fn drag_move(
        &mut self,
        target: Option<RowId>,
        source: &impl RowSource,
        pinned_collapsed: bool,
    ) -> DragMoveOutcome {
        let Some(session) = self.session.as_mut() else {
            return DragMoveOutcome::Ignored;
        };
        let Some(target) = target else {
            return DragMoveOutcome::Ignored;
        };
        match session.accepts(target, source, pinned_collapsed) {
            Some(inside_pinned) => {
                session.inside_pinned = inside_pinned;
                DragMoveOutcome::Accepted { inside_pinned }
            }
            None => DragMoveOutcome::Ignored,
        }
    }

    /// Ends the drag at `target`, committing the move when it is accepted.
    ///
    /// The session is discarded and the pre-drag overlays reopened against
    /// the resulting order, whatever the outcome.
    pub fn drop<S, H, O>(
        &mut self,
        target: Option<(RowId, DropPosition)>,
        source: &mut S,
        overlays: &mut OverlayWindowManager<H>,
        host: &mut O,
        config: &ListViewConfig,
        pinned_collapsed: bool,
    ) -> DropOutcome
    where
        S: RowSource,
        H: Clone + PartialEq,
        O: RowOverlayHost<Handle = H>,
    {
        let Some(session) = self.session.take() else {
            return DropOutcome::Cancelled;
        };
        let outcome = commit_drop(&session, target, source, pinned_collapsed);
        let source = &*source;
        let layout = RowLayout::build(source, config, pinned_collapsed);
        overlays.restore(&session.overlay_snapshot, &layout, source, host);
        outcome
    }

    /// Discards the running drag without structural change.
    ///
    /// Returns `false` when no drag was running.
    pub fn cancel<H, O>(
        &mut self,
        source: &impl RowSource,
        overlays: &mut OverlayWindowManager<H>,
        host: &mut O,
        config: &ListViewConfig,
        pinned_collapsed: bool,
    ) -> bool
    where
        H: Clone + PartialEq,
        O: RowOverlayHost<Handle = H>,
    {
        let Some(session) = self.session.take() else {
            return false;
        };
        let layout = RowLayout::build(source, config, pinned_collapsed);
        overlays.restore(&session.overlay_snapshot, &layout, source, host);
        debug!(
            "event=drag_cancel module=drag status=ok rows={}",
            session.rows.len()
        );
        true
    }
}

fn plan_preview<H: Clone + PartialEq>(
    rows: &[RowId],
    press: Point,
    layout: &RowLayout,
    source: &impl RowSource,
    overlays: &OverlayWindowManager<H>,
) -> DragPreview<H> {
    let &[id] = rows else {
        return DragPreview {
            source: DragPreviewSource::Badge { count: rows.len() },
            hotspot: Point::default(),
            trim_section_header: false,
        };
    };

    let preview_source = match overlays.handles(id).and_then(|handles| handles.first()) {
        Some(handle) => DragPreviewSource::Overlay(handle.clone()),
        None => {
            if overlays.is_active(id) {
                warn!("event=drag_preview module=drag status=fallback reason=overlay_pending row={id}");
            }
            DragPreviewSource::Rendered
        }
    };
    let top = layout.rect(id).map_or(0.0, |rect| rect.top);
    DragPreview {
        source: preview_source,
        hotspot: Point::new(press.x, press.y - top),
        trim_section_header: source.has_pinned()
            && (source.is_first_pinned(id) || source.is_first_unpinned(id)),
    }
}

fn commit_drop<S: RowSource>(
    session: &DragSession,
    target: Option<(RowId, DropPosition)>,
    source: &mut S,
    pinned_collapsed: bool,
) -> DropOutcome {
    let Some((target, position)) = target else {
        debug!("event=drag_drop module=drag status=cancelled reason=no_target");
        return DropOutcome::Cancelled;
    };
    if source.position_of(target).is_none() {
        debug!("event=drag_drop module=drag status=cancelled reason=target_missing row={target}");
        return DropOutcome::Cancelled;
    }
    if session.accepts(target, source, pinned_collapsed).is_none() {
        debug!("event=drag_drop module=drag status=rejected row={target}");
        return DropOutcome::Rejected;
    }
    if session.rows.contains(&target) {
        return DropOutcome::Cancelled;
    }

    let remaining: Vec<RowId> = source
        .ids()
        .into_iter()
        .filter(|id| !session.rows.contains(id))
        .collect();
    let Some(anchor) = remaining.iter().position(|id| *id == target) else {
        return DropOutcome::Cancelled;
    };
    let new_position = match position {
        DropPosition::Above | DropPosition::On => anchor,
        DropPosition::Below => anchor + 1,
    };

    if let Err(err) = source.reorder(&session.rows, new_position) {
        warn!("event=drag_drop module=drag status=error error={err}");
        return DropOutcome::Cancelled;
    }

    let mut moved: Vec<(usize, RowId)> = session
        .rows
        .iter()
        .filter_map(|id| source.position_of(*id).map(|position| (position, *id)))
        .collect();
    moved.sort_unstable();
    let destination = moved.first().map_or(new_position, |(position, _)| *position);
    let rows: Vec<RowId> = moved.into_iter().map(|(_, id)| id).collect();
    info!(
        "event=drag_drop module=drag status=ok rows={} destination={destination}",
        rows.len()
    );
    DropOutcome::Moved { rows, destination }
}
