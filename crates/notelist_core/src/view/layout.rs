//! Row geometry for windowing, hit testing and drop resolution.
//!
//! # Responsibility
//! - Lay rows out top-to-bottom in current order from `ListViewConfig`.
//! - Resolve content/viewport coordinates back to rows.
//!
//! # Invariants
//! - Rects are in row order and never overlap.
//! - Pinned rows hidden by the collapsed flag are not laid out; the first
//!   pinned row keeps only its header strip so the collapse toggle stays
//!   reachable.

use crate::config::ListViewConfig;
use crate::model::row::RowId;
use crate::repo::row_index::RowSource;
use crate::view::drag::DropPosition;

/// Point in viewport or content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Visible slice of the list content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Scroll offset: content y shown at the top edge.
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(top: f32, width: f32, height: f32) -> Self {
        Self { top, width, height }
    }

    /// Converts a viewport-relative point to content coordinates.
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(point.x, point.y + self.top)
    }
}

/// Laid-out geometry of one row in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowRect {
    pub id: RowId,
    pub top: f32,
    pub height: f32,
    /// False when the row's content is hidden by the pinned collapse.
    pub laid_out: bool,
}

impl RowRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    fn contains_y(&self, y: f32) -> bool {
        self.height > 0.0 && y >= self.top && y < self.bottom()
    }
}

/// Geometry snapshot for every row of one ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowLayout {
    rects: Vec<RowRect>,
}

impl RowLayout {
    /// Lays out all rows of `source` in current order.
    pub fn build(source: &impl RowSource, config: &ListViewConfig, pinned_collapsed: bool) -> Self {
        let pinned_count = source.pinned_count();
        let has_pinned = pinned_count > 0;
        let mut rects = Vec::with_capacity(source.row_count());
        let mut cursor = 0.0_f32;

        for position in 0..source.row_count() {
            let Some(row) = source.row_at(position) else {
                continue;
            };
            let section_start = has_pinned && (position == 0 || position == pinned_count);
            let header = if section_start {
                config.section_header_height
            } else {
                0.0
            };

            let (height, laid_out) = if pinned_collapsed && row.pinned {
                (if position == 0 { header } else { 0.0 }, false)
            } else {
                (config.row_height + header, true)
            };

            rects.push(RowRect {
                id: row.id,
                top: cursor,
                height,
                laid_out,
            });
            cursor += height;
        }

        Self { rects }
    }

    pub fn rects(&self) -> &[RowRect] {
        &self.rects
    }

    pub fn total_height(&self) -> f32 {
        self.rects.last().map_or(0.0, RowRect::bottom)
    }

    pub fn rect(&self, id: RowId) -> Option<&RowRect> {
        self.rects.iter().find(|rect| rect.id == id)
    }

    /// Row top relative to the viewport; `None` when the row is not laid out.
    pub fn window_y(&self, id: RowId, viewport: &Viewport) -> Option<f32> {
        self.rect(id)
            .filter(|rect| rect.laid_out)
            .map(|rect| rect.top - viewport.top)
    }

    /// Row under one content y coordinate, including collapsed header strips.
    pub fn hit_test(&self, content_y: f32) -> Option<&RowRect> {
        self.rects.iter().find(|rect| rect.contains_y(content_y))
    }

    /// Drop indicator position relative to the target row's midpoint.
    pub fn drop_position(&self, rect: &RowRect, content_y: f32) -> DropPosition {
        if content_y < rect.top + rect.height / 2.0 {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }

    /// Whether `content_point` hits the collapse toggle drawn on `rect`.
    pub fn hits_collapse_icon(
        &self,
        rect: &RowRect,
        content_point: Point,
        viewport: &Viewport,
        config: &ListViewConfig,
    ) -> bool {
        let size = config.collapse_icon_size;
        let left = viewport.width - size - 5.0;
        let top = rect.top + 2.0;
        content_point.x >= left
            && content_point.x < left + size
            && content_point.y >= top
            && content_point.y < top + size
    }
}
