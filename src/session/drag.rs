use std::fmt::Debug;

use crate::engine::EngineConfig;
use crate::grid::{GridConfig, PixelPoint, PixelRect, Position, Span, WidgetPlacement};
use crate::layout::{OccupancyIndex, is_valid};

use super::{Effect, SessionState};

/// Picks the valid cell whose footprint overlaps `rect` the most.
///
/// The search is centred on the cell under the middle of `rect`, clamped so
/// the span still fits, and reaches `max(span.x, span.y) + padding` cells in
/// every direction. Ties keep the first candidate in row-major order.
/// Returns `None` when no valid candidate overlaps `rect` at all.
pub fn best_overlap_cell(
    grid: &GridConfig,
    index: &OccupancyIndex,
    rect: PixelRect,
    span: Span,
    padding: u16,
) -> Option<Position> {
    let center = grid.cell_at(rect.center());
    let (max_row, max_col) = grid.max_origin(span);
    let center_row = i32::from(center.row).clamp(1, max_row.max(1));
    let center_col = i32::from(center.col).clamp(1, max_col.max(1));
    let radius = i32::from(span.x.max(span.y)) + i32::from(padding);

    let mut best: Option<(Position, f64)> = None;
    for row in center_row - radius..=center_row + radius {
        for col in center_col - radius..=center_col + radius {
            if !is_valid(grid, index, row, col, span) {
                continue;
            }
            let area = rect.intersection_area(&grid.cell_rect(row, col, span));
            if area <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, best_area)| area > best_area)
                && let Some(pos) = Position::from_signed(row, col)
            {
                best = Some((pos, area));
            }
        }
    }
    best.map(|(pos, _)| pos)
}

/// A widget being moved with the pointer.
#[derive(Debug, Clone)]
pub struct DragSession<Id> {
    id: Id,
    span: Span,
    origin: Position,
    /// Pointer position relative to the widget's top-left corner.
    offset: PixelPoint,
    index: OccupancyIndex,
    tentative: Position,
    last_snap_at: PixelPoint,
    config: EngineConfig,
}

impl<Id: Copy + Eq + Debug> DragSession<Id> {
    /// Starts dragging `widget` from `pointer`.
    ///
    /// The grab offset comes from the widget's model rectangle, and the
    /// occupancy snapshot excludes the widget itself.
    pub fn start(
        widget: WidgetPlacement<Id>,
        pointer: PixelPoint,
        grid: &GridConfig,
        placements: &[WidgetPlacement<Id>],
        config: EngineConfig,
    ) -> (Self, Vec<Effect<Id>>) {
        let rect = grid.placement_rect(widget.pos, widget.span);
        let session = Self {
            id: widget.id,
            span: widget.span,
            origin: widget.pos,
            offset: PixelPoint::new(pointer.x - rect.x, pointer.y - rect.y),
            index: OccupancyIndex::build(placements, Some(&widget.id)),
            tentative: widget.pos,
            last_snap_at: PixelPoint::new(rect.x, rect.y),
            config,
        };
        tracing::debug!(widget_id = ?widget.id, pos = ?widget.pos, "drag started");
        let effects = vec![
            Effect::SessionChanged(SessionState::Dragging(widget.id)),
            Effect::DragPreview {
                id: widget.id,
                cell: widget.pos,
                rect,
            },
        ];
        (session, effects)
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn tentative(&self) -> Position {
        self.tentative
    }

    pub fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    /// Where the floating widget box sits for `pointer`.
    pub fn widget_rect(&self, pointer: PixelPoint, grid: &GridConfig) -> PixelRect {
        let (width, height) = grid.span_size(self.span);
        PixelRect::new(
            pointer.x - self.offset.x,
            pointer.y - self.offset.y,
            width,
            height,
        )
    }

    /// Applies one coalesced pointer move.
    pub fn update(&mut self, pointer: PixelPoint, grid: &GridConfig) -> Vec<Effect<Id>> {
        let rect = self.widget_rect(pointer, grid);
        let mut effects = vec![Effect::DragMoved { id: self.id, rect }];

        let threshold = self.config.move_threshold;
        let moved_x = (rect.x - self.last_snap_at.x).abs() > threshold;
        let moved_y = (rect.y - self.last_snap_at.y).abs() > threshold;
        if !moved_x && !moved_y {
            return effects;
        }
        self.last_snap_at = PixelPoint::new(rect.x, rect.y);

        let snapped = best_overlap_cell(
            grid,
            &self.index,
            rect,
            self.span,
            self.config.snap_radius_padding,
        );
        let next = snapped.unwrap_or(self.tentative);
        if next != self.tentative {
            self.tentative = next;
            effects.push(Effect::DragPreview {
                id: self.id,
                cell: next,
                rect: grid.placement_rect(next, self.span),
            });
        }
        effects
    }

    /// Ends the drag, committing the tentative cell if it is still free in
    /// `placements` and the origin otherwise.
    pub fn finish(self, grid: &GridConfig, placements: &[WidgetPlacement<Id>]) -> Vec<Effect<Id>> {
        let fresh = OccupancyIndex::build(placements, Some(&self.id));
        let row = i32::from(self.tentative.row);
        let col = i32::from(self.tentative.col);
        let pos = if is_valid(grid, &fresh, row, col, self.span) {
            self.tentative
        } else {
            tracing::debug!(
                widget_id = ?self.id,
                tentative = ?self.tentative,
                origin = ?self.origin,
                "drag target went stale, reverting to origin"
            );
            self.origin
        };
        tracing::debug!(widget_id = ?self.id, ?pos, "drag committed");
        vec![
            Effect::CommitPosition { id: self.id, pos },
            Effect::SessionChanged(SessionState::Idle),
        ]
    }

    /// Aborts the drag without committing.
    pub fn cancel(self) -> Vec<Effect<Id>> {
        tracing::debug!(widget_id = ?self.id, "drag cancelled");
        vec![
            Effect::Reverted {
                id: self.id,
                pos: self.origin,
                span: self.span,
            },
            Effect::SessionChanged(SessionState::Idle),
        ]
    }
}
