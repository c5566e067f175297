//! Per-row transition tickets and deferred removal.
//!
//! # Responsibility
//! - Record which visual transition each row is in.
//! - Defer structural row removal until the remove transition completes.
//!
//! # Invariants
//! - Every id in `pending_removal` holds a `Remove` ticket.
//! - A row leaves `pending_removal` only through a completion notification
//!   covering it; that path is the only one that deletes rows here.
//! - Completion for rows the source no longer resolves is a no-op.

use crate::model::row::RowId;
use crate::model::transition::TransitionState;
use crate::repo::row_index::RowSource;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Rows that entered one transition state together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionBatch {
    pub state: TransitionState,
    pub rows: Vec<RowId>,
}

impl TransitionBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a removal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    /// Transition the animator should play.
    pub batch: TransitionBatch,
    /// Rows deleted immediately because animations are disabled.
    pub removed: Vec<RowId>,
}

/// Two-phase ticket protocol: requests record intent, completions apply it.
#[derive(Debug, Clone)]
pub struct AnimationStateMachine {
    enabled: bool,
    tickets: BTreeMap<RowId, TransitionState>,
    pending_removal: Vec<RowId>,
}

impl Default for AnimationStateMachine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AnimationStateMachine {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            tickets: BTreeMap::new(),
            pending_removal: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current ticket of one row; `Normal` when none is in flight.
    pub fn ticket(&self, id: RowId) -> TransitionState {
        self.tickets
            .get(&id)
            .copied()
            .unwrap_or(TransitionState::Normal)
    }

    /// Rows waiting for their remove transition to finish, in request order.
    pub fn pending_removal(&self) -> &[RowId] {
        &self.pending_removal
    }

    pub fn is_pending_removal(&self, id: RowId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Rows were inserted by the store.
    pub fn mark_inserted(&mut self, rows: &[RowId]) -> TransitionBatch {
        self.apply(rows, TransitionState::Insert)
    }

    /// Rows are about to move (reorder source side).
    pub fn mark_move_out(&mut self, rows: &[RowId]) -> TransitionBatch {
        self.apply(rows, TransitionState::MoveOut)
    }

    /// Rows landed at their new positions (reorder destination side).
    pub fn mark_move_in(&mut self, rows: &[RowId]) -> TransitionBatch {
        self.apply(rows, TransitionState::Insert)
    }

    /// Requests removal of rows.
    ///
    /// With animations enabled the rows get `Remove` tickets and wait in
    /// `pending_removal`; otherwise they are deleted from `source` right away.
    /// Ids the source does not resolve are ignored.
    pub fn mark_remove_requested(
        &mut self,
        rows: &[RowId],
        source: &mut impl RowSource,
    ) -> RemovalRequest {
        let known: Vec<RowId> = rows
            .iter()
            .copied()
            .filter(|id| source.position_of(*id).is_some())
            .collect();

        if !self.enabled {
            let mut removed = Vec::with_capacity(known.len());
            for id in &known {
                self.tickets.remove(id);
                self.pending_removal.retain(|pending| pending != id);
                if delete_row(*id, source) {
                    removed.push(*id);
                }
            }
            return RemovalRequest {
                batch: TransitionBatch {
                    state: TransitionState::Normal,
                    rows: known,
                },
                removed,
            };
        }

        for id in &known {
            self.tickets.insert(*id, TransitionState::Remove);
            if !self.pending_removal.contains(id) {
                self.pending_removal.push(*id);
            }
        }
        debug!(
            "event=transition_start module=animation status=ok state=remove rows={} pending={}",
            known.len(),
            self.pending_removal.len()
        );
        RemovalRequest {
            batch: TransitionBatch {
                state: TransitionState::Remove,
                rows: known,
            },
            removed: Vec::new(),
        }
    }

    /// Animator reports every row under `state` finished.
    ///
    /// For `Remove` this drains `pending_removal`, deleting each row by its
    /// current position. Returns the rows actually deleted.
    pub fn on_animation_finished(
        &mut self,
        state: TransitionState,
        source: &mut impl RowSource,
    ) -> Vec<RowId> {
        match state {
            TransitionState::Normal => Vec::new(),
            TransitionState::Remove => {
                let pending = std::mem::take(&mut self.pending_removal);
                let mut removed = Vec::with_capacity(pending.len());
                for id in pending {
                    self.tickets.remove(&id);
                    if delete_row(id, source) {
                        removed.push(id);
                    }
                }
                if !removed.is_empty() {
                    info!(
                        "event=deferred_remove module=animation status=ok rows={}",
                        removed.len()
                    );
                }
                removed
            }
            TransitionState::Insert | TransitionState::MoveOut => {
                self.tickets.retain(|_, ticket| *ticket != state);
                Vec::new()
            }
        }
    }

    /// Animator reports one row finished `state`.
    ///
    /// Returns `true` when a pending removal of that row was applied.
    pub fn on_row_animation_finished(
        &mut self,
        id: RowId,
        state: TransitionState,
        source: &mut impl RowSource,
    ) -> bool {
        if state == TransitionState::Normal || self.ticket(id) != state {
            return false;
        }
        self.tickets.remove(&id);
        if state != TransitionState::Remove {
            return false;
        }
        self.pending_removal.retain(|pending| *pending != id);
        delete_row(id, source)
    }

    fn apply(&mut self, rows: &[RowId], requested: TransitionState) -> TransitionBatch {
        let state = if self.enabled {
            requested
        } else {
            TransitionState::Normal
        };
        // Rows already fading out keep their Remove ticket.
        let rows: Vec<RowId> = rows
            .iter()
            .copied()
            .filter(|id| !self.pending_removal.contains(id))
            .collect();
        for id in &rows {
            if state == TransitionState::Normal {
                self.tickets.remove(id);
            } else {
                self.tickets.insert(*id, state);
            }
        }
        debug!(
            "event=transition_start module=animation status=ok state={} rows={}",
            state.as_str(),
            rows.len()
        );
        TransitionBatch { state, rows }
    }
}

fn delete_row(id: RowId, source: &mut impl RowSource) -> bool {
    let Some(position) = source.position_of(id) else {
        debug!("event=row_delete module=animation status=skipped reason=already_removed row={id}");
        return false;
    };
    match source.delete_at(position) {
        Ok(_) => true,
        Err(err) => {
            warn!("event=row_delete module=animation status=error row={id} error={err}");
            false
        }
    }
}
