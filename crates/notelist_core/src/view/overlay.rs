//! Scroll-windowed interactive overlays.
//!
//! # Responsibility
//! - Keep a bounded, scroll-relative set of rows overlay-active.
//! - Request overlay creation/destruction through the `RowOverlayHost` seam.
//!
//! # Invariants
//! - Registry membership, not handle count, decides whether an overlay
//!   should exist; an empty handle list means creation is still pending.
//! - After a scan settles, the active set is exactly the interactive rows
//!   whose window y lies in `[-range, 2 * range]`, `range` being the
//!   viewport height.
//! - Scans re-derive the active set from the current layout, so arbitrary
//!   row-set changes (sort, filter, delete) are tolerated.

use crate::model::row::{RowId, RowKind};
use crate::repo::row_index::RowSource;
use crate::view::layout::{RowLayout, Viewport};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Capability implemented by the view layer that owns overlay widgets.
///
/// Creation may materialize later; hosts that create asynchronously return
/// `None` and hand the handle back through
/// `OverlayWindowManager::attach_handle`.
pub trait RowOverlayHost {
    type Handle: Clone + PartialEq;

    /// Requests an overlay of `kind` for one row.
    fn create_overlay(&mut self, row: RowId, kind: RowKind) -> Option<Self::Handle>;
    /// Requests destruction of every overlay alive for one row.
    fn destroy_overlay(&mut self, row: RowId, handles: Vec<Self::Handle>);
}

/// Overlay registry owner.
#[derive(Debug)]
pub struct OverlayWindowManager<H> {
    registry: BTreeMap<RowId, Vec<H>>,
    last_viewport: Option<Viewport>,
}

impl<H> Default for OverlayWindowManager<H> {
    fn default() -> Self {
        Self {
            registry: BTreeMap::new(),
            last_viewport: None,
        }
    }
}

impl<H: Clone + PartialEq> OverlayWindowManager<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: RowId) -> bool {
        self.registry.contains_key(&id)
    }

    /// Active row ids in ascending id order.
    pub fn active_ids(&self) -> Vec<RowId> {
        self.registry.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Materialized handles for one active row.
    pub fn handles(&self, id: RowId) -> Option<&[H]> {
        self.registry.get(&id).map(Vec::as_slice)
    }

    /// Viewport of the most recent scroll scan.
    pub fn last_viewport(&self) -> Option<Viewport> {
        self.last_viewport
    }

    /// Requests an overlay for one row.
    ///
    /// Returns `true` when the row became active. Already-active rows, rows
    /// the source no longer knows and rows without interactive content are
    /// left untouched.
    pub fn activate<O>(&mut self, id: RowId, source: &impl RowSource, host: &mut O) -> bool
    where
        O: RowOverlayHost<Handle = H>,
    {
        if self.registry.contains_key(&id) {
            return false;
        }
        let Some(row) = source.row(id) else {
            debug!("event=overlay_activate module=overlay status=skipped reason=row_missing row={id}");
            return false;
        };
        let kind = row.kind();
        if !kind.wants_overlay() {
            return false;
        }

        let mut handles = Vec::new();
        if let Some(handle) = host.create_overlay(id, kind) {
            handles.push(handle);
        }
        debug!(
            "event=overlay_activate module=overlay status=ok row={id} materialized={}",
            !handles.is_empty()
        );
        self.registry.insert(id, handles);
        true
    }

    /// Requests destruction of one row's overlays and drops it from the registry.
    pub fn deactivate<O>(&mut self, id: RowId, host: &mut O) -> bool
    where
        O: RowOverlayHost<Handle = H>,
    {
        let Some(handles) = self.registry.remove(&id) else {
            return false;
        };
        debug!(
            "event=overlay_deactivate module=overlay status=ok row={id} handles={}",
            handles.len()
        );
        host.destroy_overlay(id, handles);
        true
    }

    /// Deactivates every active row.
    pub fn close_all<O>(&mut self, host: &mut O)
    where
        O: RowOverlayHost<Handle = H>,
    {
        for id in self.active_ids() {
            self.deactivate(id, host);
        }
    }

    /// Records a handle that materialized after activation.
    pub fn attach_handle(&mut self, id: RowId, handle: H) -> bool {
        match self.registry.get_mut(&id) {
            Some(handles) => {
                handles.push(handle);
                true
            }
            None => {
                warn!("event=overlay_attach module=overlay status=ignored reason=not_registered row={id}");
                false
            }
        }
    }

    /// Forgets a handle the host tore down on its own.
    pub fn detach_handle(&mut self, id: RowId, handle: &H) -> bool {
        let Some(handles) = self.registry.get_mut(&id) else {
            return false;
        };
        let before = handles.len();
        handles.retain(|current| current != handle);
        before != handles.len()
    }

    /// Applies the windowing policy for a new viewport.
    pub fn on_scroll<O>(
        &mut self,
        viewport: Viewport,
        layout: &RowLayout,
        source: &impl RowSource,
        host: &mut O,
    ) where
        O: RowOverlayHost<Handle = H>,
    {
        self.last_viewport = Some(viewport);
        self.scan(&viewport, layout, source, host);
    }

    /// Re-runs the windowing scan against the last seen viewport.
    pub fn rescan<O>(&mut self, layout: &RowLayout, source: &impl RowSource, host: &mut O)
    where
        O: RowOverlayHost<Handle = H>,
    {
        if let Some(viewport) = self.last_viewport {
            self.scan(&viewport, layout, source, host);
        }
    }

    /// Re-opens a saved active set, then reconciles it with the window.
    pub fn restore<O>(
        &mut self,
        ids: &[RowId],
        layout: &RowLayout,
        source: &impl RowSource,
        host: &mut O,
    ) where
        O: RowOverlayHost<Handle = H>,
    {
        self.close_all(host);
        for id in ids {
            self.activate(*id, source, host);
        }
        self.rescan(layout, source, host);
    }

    fn scan<O>(
        &mut self,
        viewport: &Viewport,
        layout: &RowLayout,
        source: &impl RowSource,
        host: &mut O,
    ) where
        O: RowOverlayHost<Handle = H>,
    {
        let stale: Vec<RowId> = self
            .registry
            .keys()
            .copied()
            .filter(|id| !source.has_interactive_content(*id))
            .collect();
        for id in stale {
            self.deactivate(id, host);
        }

        let range = viewport.height.abs();
        let lower = -range;
        let upper = 2.0 * range;
        let mut unvisited_active = self.registry.len();

        for rect in layout.rects() {
            let window_y = rect.laid_out.then(|| rect.top - viewport.top);
            if self.registry.contains_key(&rect.id) {
                unvisited_active = unvisited_active.saturating_sub(1);
                let inside = window_y.is_some_and(|y| y >= lower && y <= upper);
                if !inside {
                    self.deactivate(rect.id, host);
                }
                continue;
            }

            let Some(y) = window_y else {
                continue;
            };
            if y < lower {
                continue;
            }
            if y > upper {
                // Rows are ordered top-to-bottom; nothing further can enter.
                if unvisited_active == 0 {
                    break;
                }
                continue;
            }
            self.activate(rect.id, source, host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayWindowManager, RowOverlayHost};
    use crate::config::ListViewConfig;
    use crate::model::row::{Row, RowId, RowKind};
    use crate::repo::row_index::RowIndex;
    use crate::view::layout::{RowLayout, Viewport};

    #[derive(Default)]
    struct CountingHost {
        next: u32,
        created: Vec<RowId>,
        destroyed: Vec<RowId>,
        deferred: bool,
    }

    impl RowOverlayHost for CountingHost {
        type Handle = u32;

        fn create_overlay(&mut self, row: RowId, _kind: RowKind) -> Option<u32> {
            self.created.push(row);
            if self.deferred {
                return None;
            }
            self.next += 1;
            Some(self.next)
        }

        fn destroy_overlay(&mut self, row: RowId, _handles: Vec<u32>) {
            self.destroyed.push(row);
        }
    }

    fn interactive_rows(count: i64) -> RowIndex {
        RowIndex::from_rows((1..=count).map(|id| Row::new(id).with_interactive(true)))
            .expect("unique rows")
    }

    fn config() -> ListViewConfig {
        ListViewConfig {
            row_height: 10.0,
            ..ListViewConfig::default()
        }
    }

    #[test]
    fn activation_is_idempotent_and_skips_plain_rows() {
        let index = RowIndex::from_rows([Row::new(1), Row::new(2).with_interactive(true)])
            .expect("unique rows");
        let mut host = CountingHost::default();
        let mut manager = OverlayWindowManager::new();

        assert!(!manager.activate(1, &index, &mut host));
        assert!(manager.activate(2, &index, &mut host));
        assert!(!manager.activate(2, &index, &mut host));
        assert_eq!(host.created, vec![2]);
        assert_eq!(manager.handles(2), Some(&[1][..]));
    }

    #[test]
    fn scroll_window_spans_one_viewport_above_and_two_below() {
        let index = interactive_rows(20);
        let layout = RowLayout::build(&index, &config(), false);
        let mut host = CountingHost::default();
        let mut manager = OverlayWindowManager::new();

        manager.on_scroll(Viewport::new(50.0, 100.0, 20.0), &layout, &index, &mut host);
        // Row tops are 0,10,..; window y in [-20, 40] means content y in [30, 90].
        assert_eq!(manager.active_ids(), vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn scrolling_away_deactivates_and_rescan_is_stable() {
        let index = interactive_rows(20);
        let layout = RowLayout::build(&index, &config(), false);
        let mut host = CountingHost::default();
        let mut manager = OverlayWindowManager::new();

        manager.on_scroll(Viewport::new(0.0, 100.0, 20.0), &layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![1, 2, 3, 4, 5]);
        manager.on_scroll(Viewport::new(150.0, 100.0, 20.0), &layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(host.destroyed, vec![1, 2, 3, 4, 5]);

        let created_before = host.created.len();
        manager.rescan(&layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(host.created.len(), created_before);
    }

    #[test]
    fn plain_row_past_window_does_not_strand_active_rows() {
        let mut rows = vec![Row::new(1).with_interactive(true), Row::new(2)];
        rows.extend((3..=6).map(|id| Row::new(id).with_interactive(true)));
        let index = RowIndex::from_rows(rows).expect("unique rows");
        let layout = RowLayout::build(&index, &config(), false);
        let mut host = CountingHost::default();
        let mut manager = OverlayWindowManager::new();

        manager.on_scroll(Viewport::new(0.0, 100.0, 30.0), &layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![1, 3, 4, 5, 6]);
        // Plain row 2 sits past the window before the active rows below it.
        manager.on_scroll(Viewport::new(0.0, 100.0, 4.0), &layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![1]);
        assert_eq!(host.destroyed, vec![3, 4, 5, 6]);
    }

    #[test]
    fn deferred_creation_registers_empty_handle_set() {
        let index = interactive_rows(1);
        let mut host = CountingHost {
            deferred: true,
            ..CountingHost::default()
        };
        let mut manager = OverlayWindowManager::new();

        assert!(manager.activate(1, &index, &mut host));
        assert_eq!(manager.handles(1), Some(&[][..]));
        assert!(manager.attach_handle(1, 42));
        assert_eq!(manager.handles(1), Some(&[42][..]));
        assert!(manager.detach_handle(1, &42));
        assert!(!manager.attach_handle(9, 7));
    }

    #[test]
    fn rows_removed_from_source_are_released_on_scan() {
        let mut index = interactive_rows(3);
        let mut host = CountingHost::default();
        let mut manager = OverlayWindowManager::new();
        let layout = RowLayout::build(&index, &config(), false);
        manager.on_scroll(Viewport::new(0.0, 100.0, 100.0), &layout, &index, &mut host);
        assert_eq!(manager.len(), 3);

        index.remove(2).expect("row exists");
        let layout = RowLayout::build(&index, &config(), false);
        manager.rescan(&layout, &index, &mut host);
        assert_eq!(manager.active_ids(), vec![1, 3]);
        assert_eq!(host.destroyed, vec![2]);
    }
}
