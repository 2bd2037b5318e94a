use std::collections::BTreeSet;

use crate::grid::{GridConfig, Span, WidgetPlacement};

/// Canonical key for a single grid cell.
///
/// Packs `(row, col)` into one integer so lookups compare a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey(u32);

impl CellKey {
    pub fn new(row: u16, col: u16) -> Self {
        Self((u32::from(row) << 16) | u32::from(col))
    }

    pub fn row(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub fn col(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

/// The set of cells covered by every widget except the one being
/// manipulated.
///
/// Always rebuilt from the authoritative placement list; never patched in
/// place, so a stale index can only come from an old snapshot and never
/// from leaked state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    cells: BTreeSet<CellKey>,
}

impl OccupancyIndex {
    pub fn build<'a, Id, I>(placements: I, exclude: Option<&Id>) -> Self
    where
        Id: PartialEq + 'a,
        I: IntoIterator<Item = &'a WidgetPlacement<Id>>,
    {
        let mut cells = BTreeSet::new();
        for placement in placements {
            if exclude.is_some_and(|id| *id == placement.id) {
                continue;
            }
            cells.extend(placement.cells().map(|(row, col)| CellKey::new(row, col)));
        }
        Self { cells }
    }

    pub fn is_occupied(&self, row: u16, col: u16) -> bool {
        self.cells.contains(&CellKey::new(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.iter().copied()
    }
}

/// Whether a widget of `span` can sit with its top-left at `(row, col)`:
/// fully inside the grid and clear of every occupied cell.
///
/// The first-fit solver, drag snapping, and resize validation all call this;
/// none of them carry their own bounds or collision checks.
pub fn is_valid(grid: &GridConfig, index: &OccupancyIndex, row: i32, col: i32, span: Span) -> bool {
    if span.x == 0 || span.y == 0 || !grid.contains_span(row, col, span) {
        return false;
    }
    // contains_span keeps every footprint cell within 1..=u16::MAX.
    let cols = col..col + i32::from(span.x);
    !(row..row + i32::from(span.y))
        .any(|r| cols.clone().any(|c| index.is_occupied(r as u16, c as u16)))
}
