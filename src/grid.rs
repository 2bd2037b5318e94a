//! Grid geometry: cell coordinates, spans, and the pixel mapping between
//! the viewport and the 1-indexed row/column grid.

use std::ops::Range;

use crate::error::LayoutError;

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Area shared by both rectangles; zero when they only touch or are apart.
    pub fn intersection_area(&self, other: &PixelRect) -> f64 {
        let overlap_x = (self.right().min(other.right()) - self.x.max(other.x)).max(0.0);
        let overlap_y = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0);
        overlap_x * overlap_y
    }
}

/// A widget's size in cells: `x` columns wide, `y` rows tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub x: u16,
    pub y: u16,
}

impl Span {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn validate(self) -> Result<Self, LayoutError> {
        if self.x == 0 || self.y == 0 {
            return Err(LayoutError::EmptySpan {
                x: self.x,
                y: self.y,
            });
        }
        Ok(self)
    }

    /// Manhattan distance between two spans, in cells.
    pub fn distance(self, other: Span) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

/// The 1-indexed top-left cell of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: u16,
    pub col: u16,
}

impl Position {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Converts a signed search coordinate back into a position. Returns
    /// `None` for anything left of or above the grid origin.
    pub fn from_signed(row: i32, col: i32) -> Option<Self> {
        let row = u16::try_from(row).ok().filter(|r| *r >= 1)?;
        let col = u16::try_from(col).ok().filter(|c| *c >= 1)?;
        Some(Self { row, col })
    }
}

/// A widget's slot in the grid. The host owns these; the engine only
/// proposes new `pos` or `span` values for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetPlacement<Id> {
    pub id: Id,
    pub pos: Position,
    pub span: Span,
}

impl<Id> WidgetPlacement<Id> {
    pub fn new(id: Id, pos: Position, span: Span) -> Self {
        Self { id, pos, span }
    }

    /// Every `(row, col)` covered by this widget, row-major. Cells past
    /// `u16::MAX` cannot exist on any grid and are skipped.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        let (rows, cols) = self.extent();
        rows.filter_map(|row| u16::try_from(row).ok())
            .flat_map(move |row| {
                cols.clone()
                    .filter_map(|col| u16::try_from(col).ok())
                    .map(move |col| (row, col))
            })
    }

    pub fn overlaps(&self, other: &WidgetPlacement<Id>) -> bool {
        let (rows, cols) = self.extent();
        let (other_rows, other_cols) = other.extent();
        rows.start < other_rows.end
            && other_rows.start < rows.end
            && cols.start < other_cols.end
            && other_cols.start < cols.end
    }

    /// Half-open row and column ranges of the footprint, widened to `u32`.
    fn extent(&self) -> (Range<u32>, Range<u32>) {
        let row = u32::from(self.pos.row);
        let col = u32::from(self.pos.col);
        (
            row..row + u32::from(self.span.y),
            col..col + u32::from(self.span.x),
        )
    }
}

/// The grid a dashboard lays widgets out on.
///
/// Hosts refresh this whenever the viewport changes; the engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    rows: u16,
    cols: u16,
    cell_size: f64,
    gap: f64,
    bounds: PixelRect,
}

impl GridConfig {
    /// Builds a grid anchored at the viewport origin.
    pub fn new(rows: u16, cols: u16, cell_size: f64, gap: f64) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::EmptyGrid { rows, cols });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(LayoutError::InvalidCellSize(cell_size));
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(LayoutError::InvalidGap(gap));
        }
        let mut grid = Self {
            rows,
            cols,
            cell_size,
            gap,
            bounds: PixelRect::default(),
        };
        grid.bounds = PixelRect::new(
            0.0,
            0.0,
            grid.extent(cols),
            grid.extent(rows),
        );
        Ok(grid)
    }

    /// Moves the grid so its top-left corner sits at `origin`.
    pub fn with_origin(mut self, origin: PixelPoint) -> Self {
        self.bounds.x = origin.x;
        self.bounds.y = origin.y;
        self
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Distance between the top-left corners of adjacent cells.
    pub fn pitch(&self) -> f64 {
        self.cell_size + self.gap
    }

    fn extent(&self, cells: u16) -> f64 {
        let cells = f64::from(cells);
        cells * self.cell_size + (cells - 1.0).max(0.0) * self.gap
    }

    /// Pixel width and height of a widget with `span`.
    pub fn span_size(&self, span: Span) -> (f64, f64) {
        (self.extent(span.x), self.extent(span.y))
    }

    /// The rectangle a widget of `span` would cover with its top-left at
    /// `(row, col)`. Coordinates may lie outside the grid.
    pub fn cell_rect(&self, row: i32, col: i32, span: Span) -> PixelRect {
        let (width, height) = self.span_size(span);
        PixelRect::new(
            self.bounds.x + f64::from(col - 1) * self.pitch(),
            self.bounds.y + f64::from(row - 1) * self.pitch(),
            width,
            height,
        )
    }

    pub fn placement_rect(&self, pos: Position, span: Span) -> PixelRect {
        self.cell_rect(i32::from(pos.row), i32::from(pos.col), span)
    }

    /// The cell under `point`, clamped into the grid.
    pub fn cell_at(&self, point: PixelPoint) -> Position {
        let row = self.axis_cell(point.y - self.bounds.y, self.rows);
        let col = self.axis_cell(point.x - self.bounds.x, self.cols);
        Position::new(row, col)
    }

    fn axis_cell(&self, offset: f64, limit: u16) -> u16 {
        let index = (offset / self.pitch()).floor() + 1.0;
        index.clamp(1.0, f64::from(limit)) as u16
    }

    /// Largest top-left row and column at which `span` still fits. Zero when
    /// the span is larger than the grid on that axis.
    pub fn max_origin(&self, span: Span) -> (i32, i32) {
        (
            i32::from(self.rows) - i32::from(span.y) + 1,
            i32::from(self.cols) - i32::from(span.x) + 1,
        )
    }

    /// Largest span that fits with its top-left at `pos`.
    pub fn max_span_at(&self, pos: Position) -> Span {
        Span::new(
            self.cols.saturating_sub(pos.col).saturating_add(1),
            self.rows.saturating_sub(pos.row).saturating_add(1),
        )
    }

    pub fn contains_span(&self, row: i32, col: i32, span: Span) -> bool {
        row >= 1
            && col >= 1
            && row + i32::from(span.y) - 1 <= i32::from(self.rows)
            && col + i32::from(span.x) - 1 <= i32::from(self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridConfig {
        GridConfig::new(4, 6, 120.0, 10.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert_eq!(
            GridConfig::new(0, 3, 10.0, 0.0),
            Err(LayoutError::EmptyGrid { rows: 0, cols: 3 })
        );
        assert!(matches!(
            GridConfig::new(2, 2, 0.0, 0.0),
            Err(LayoutError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridConfig::new(2, 2, 10.0, -1.0),
            Err(LayoutError::InvalidGap(_))
        ));
    }

    #[test]
    fn bounds_cover_cells_and_inner_gaps() {
        let g = grid();
        let b = g.bounds();
        assert_eq!(b.width, 6.0 * 120.0 + 5.0 * 10.0);
        assert_eq!(b.height, 4.0 * 120.0 + 3.0 * 10.0);
    }

    #[test]
    fn cell_rect_includes_gaps_between_spanned_cells() {
        let g = grid().with_origin(PixelPoint::new(5.0, 7.0));
        let r = g.cell_rect(2, 3, Span::new(2, 1));
        assert_eq!(r, PixelRect::new(5.0 + 260.0, 7.0 + 130.0, 250.0, 120.0));
    }

    #[test]
    fn cell_at_clamps_to_grid() {
        let g = grid();
        assert_eq!(g.cell_at(PixelPoint::new(-40.0, -1.0)), Position::new(1, 1));
        assert_eq!(g.cell_at(PixelPoint::new(265.0, 135.0)), Position::new(2, 3));
        assert_eq!(
            g.cell_at(PixelPoint::new(10_000.0, 10_000.0)),
            Position::new(4, 6)
        );
    }

    #[test]
    fn intersection_area_of_disjoint_rects_is_zero() {
        let a = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PixelRect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&b), 0.0);
        let c = PixelRect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&c), 25.0);
    }

    #[test]
    fn footprint_cells_are_row_major() {
        let w = WidgetPlacement::new(1u8, Position::new(2, 3), Span::new(2, 2));
        let cells: Vec<_> = w.cells().collect();
        assert_eq!(cells, vec![(2, 3), (2, 4), (3, 3), (3, 4)]);
    }

    #[test]
    fn overlap_requires_shared_cell() {
        let a = WidgetPlacement::new(1u8, Position::new(1, 1), Span::new(2, 2));
        let b = WidgetPlacement::new(2u8, Position::new(1, 3), Span::new(1, 1));
        let c = WidgetPlacement::new(3u8, Position::new(2, 2), Span::new(1, 1));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn footprint_at_u16_limit_is_not_empty() {
        let edge = WidgetPlacement::new(1u8, Position::new(u16::MAX, u16::MAX), Span::new(1, 1));
        assert_eq!(edge.cells().collect::<Vec<_>>(), vec![(u16::MAX, u16::MAX)]);
        assert!(edge.overlaps(&edge));

        let spill = WidgetPlacement::new(2u8, Position::new(u16::MAX, 1), Span::new(2, 2));
        assert_eq!(
            spill.cells().collect::<Vec<_>>(),
            vec![(u16::MAX, 1), (u16::MAX, 2)]
        );
    }

    #[test]
    fn max_span_at_edges() {
        let g = grid();
        assert_eq!(g.max_span_at(Position::new(1, 1)), Span::new(6, 4));
        assert_eq!(g.max_span_at(Position::new(4, 6)), Span::new(1, 1));
    }

    #[test]
    fn position_from_signed_rejects_origin_overflow() {
        assert_eq!(Position::from_signed(0, 1), None);
        assert_eq!(Position::from_signed(1, -3), None);
        assert_eq!(Position::from_signed(2, 5), Some(Position::new(2, 5)));
    }
}
