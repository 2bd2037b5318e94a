use crate::grid::{GridConfig, Position, Span};

use super::occupancy::{OccupancyIndex, is_valid};

/// Finds the lexicographically smallest `(row, col)` where `span` fits.
///
/// Scans row-major, so the same placements and span always produce the
/// same answer. Returns `None` when the grid has no room; callers creating a
/// widget should then simply not add it.
pub fn find_first_fit(span: Span, grid: &GridConfig, index: &OccupancyIndex) -> Option<Position> {
    if span.x == 0 || span.y == 0 || span.x > grid.cols() || span.y > grid.rows() {
        return None;
    }
    let (max_row, max_col) = grid.max_origin(span);
    for row in 1..=max_row {
        for col in 1..=max_col {
            if is_valid(grid, index, row, col, span) {
                return Position::from_signed(row, col);
            }
        }
    }
    None
}
