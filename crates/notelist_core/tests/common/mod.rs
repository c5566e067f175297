#![allow(dead_code)]

use notelist_core::{
    ListEvent, ListViewConfig, ListViewController, PointerEvent, Row, RowId, RowIndex, RowKind,
    RowOverlayHost, Viewport,
};

/// Overlay host that records every request.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next: u32,
    pub created: Vec<RowId>,
    pub destroyed: Vec<RowId>,
}

impl RowOverlayHost for RecordingHost {
    type Handle = u32;

    fn create_overlay(&mut self, row: RowId, _kind: RowKind) -> Option<u32> {
        self.created.push(row);
        self.next += 1;
        Some(self.next)
    }

    fn destroy_overlay(&mut self, row: RowId, _handles: Vec<u32>) {
        self.destroyed.push(row);
    }
}

pub type TestList = ListViewController<RowIndex, RecordingHost, Vec<ListEvent>>;

pub fn list_of(rows: impl IntoIterator<Item = Row>) -> TestList {
    let index = RowIndex::from_rows(rows).unwrap();
    let mut list = ListViewController::new(
        ListViewConfig::default(),
        index,
        RecordingHost::default(),
        Vec::new(),
    );
    list.on_scroll(Viewport::new(0.0, 300.0, 400.0));
    list
}

/// Viewport y a few pixels into the row at `position`.
pub fn top_half_y(list: &TestList, position: usize) -> f32 {
    let rect = list.layout().rects()[position];
    rect.bottom() - rect.height / 2.0 - 4.0 - list.viewport().top
}

/// Viewport y in the lower half of the row at `position`.
pub fn bottom_half_y(list: &TestList, position: usize) -> f32 {
    let rect = list.layout().rects()[position];
    rect.bottom() - 4.0 - list.viewport().top
}

pub fn click(list: &mut TestList, position: usize, ctrl: bool) {
    let y = top_half_y(list, position);
    let event = if ctrl {
        PointerEvent::primary(40.0, y).with_ctrl()
    } else {
        PointerEvent::primary(40.0, y)
    };
    list.pointer_press(event);
    list.pointer_release(event);
}

/// Presses on the row at `position` and moves far enough to start a drag.
pub fn start_drag(list: &mut TestList, position: usize) {
    let y = top_half_y(list, position);
    list.pointer_press(PointerEvent::primary(40.0, y));
    list.pointer_move(PointerEvent::primary(40.0, y + 15.0))
        .unwrap();
}
