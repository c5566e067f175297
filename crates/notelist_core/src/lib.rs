//! Controller core of a reorderable note list.
//! This crate owns the overlay windowing, selection, animation and drag
//! invariants; rendering and persistence stay with the embedding shell.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ConfigError, ListViewConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{EventSink, ListEvent};
pub use model::row::{FolderId, Row, RowId, RowKind, TagId};
pub use model::transition::TransitionState;
pub use repo::row_index::{RowIndex, RowIndexError, RowIndexResult, RowSource};
pub use service::context_actions::{ContextActionPlan, NoteCatalog, PinChoice, ViewContext};
pub use service::list_view::{ListViewController, PointerButton, PointerEvent};
pub use view::animation::{AnimationStateMachine, RemovalRequest, TransitionBatch};
pub use view::drag::{
    DragMoveOutcome, DragPreview, DragPreviewSource, DragReorderController, DragSession,
    DropOutcome, DropPosition,
};
pub use view::layout::{Point, RowLayout, RowRect, Viewport};
pub use view::overlay::{OverlayWindowManager, RowOverlayHost};
pub use view::selection::{SelectionChange, SelectionController, SelectionMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
