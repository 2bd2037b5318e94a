use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::LayoutError;
use crate::grid::{GridConfig, Position, Span, WidgetPlacement};
use crate::session::Effect;

use super::occupancy::OccupancyIndex;
use super::placement::find_first_fit;

/// An id-keyed placement store a host can use as its source of truth.
///
/// Iteration follows id order so every snapshot handed to the engine is
/// reproducible.
#[derive(Debug, Clone)]
pub struct Placements<Id: Copy + Eq + Ord> {
    entries: BTreeMap<Id, WidgetPlacement<Id>>,
}

impl<Id: Copy + Eq + Ord> Default for Placements<Id> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<Id: Copy + Eq + Ord + Debug> Placements<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.entries.keys().copied().collect()
    }

    pub fn get(&self, id: Id) -> Option<WidgetPlacement<Id>> {
        self.entries.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetPlacement<Id>> {
        self.entries.values()
    }

    pub fn to_vec(&self) -> Vec<WidgetPlacement<Id>> {
        self.entries.values().copied().collect()
    }

    /// Places a new widget at the first free slot for `span`.
    ///
    /// Returns `None` and leaves the collection untouched when the id is
    /// already present or the grid has no room.
    pub fn insert_first_fit(&mut self, id: Id, span: Span, grid: &GridConfig) -> Option<Position> {
        if self.entries.contains_key(&id) {
            tracing::debug!(widget_id = ?id, "widget already placed");
            return None;
        }
        let index = OccupancyIndex::build(self.entries.values(), None);
        let Some(pos) = find_first_fit(span, grid, &index) else {
            tracing::debug!(widget_id = ?id, ?span, "no room for widget");
            return None;
        };
        self.entries.insert(id, WidgetPlacement::new(id, pos, span));
        tracing::debug!(widget_id = ?id, ?pos, ?span, "placed widget");
        Some(pos)
    }

    /// Inserts a placement as-is. Used when restoring a saved layout; run
    /// [`Placements::check_invariants`] afterwards.
    pub fn insert(&mut self, placement: WidgetPlacement<Id>) {
        self.entries.insert(placement.id, placement);
    }

    pub fn remove(&mut self, id: Id) -> Option<WidgetPlacement<Id>> {
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            tracing::debug!(widget_id = ?id, "removed widget");
        }
        removed
    }

    /// Writes a commit effect back into the collection. Returns `true` when
    /// an entry changed.
    pub fn apply(&mut self, effect: &Effect<Id>) -> bool {
        match *effect {
            Effect::CommitPosition { id, pos } => match self.entries.get_mut(&id) {
                Some(entry) if entry.pos != pos => {
                    entry.pos = pos;
                    true
                }
                _ => false,
            },
            Effect::CommitSpan { id, span } => match self.entries.get_mut(&id) {
                Some(entry) if entry.span != span => {
                    entry.span = span;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Verifies every widget covers at least one cell, lies inside `grid`,
    /// and shares no cell with another widget.
    pub fn check_invariants(&self, grid: &GridConfig) -> Result<(), LayoutError> {
        for entry in self.entries.values() {
            entry.span.validate()?;
            if !grid.contains_span(i32::from(entry.pos.row), i32::from(entry.pos.col), entry.span) {
                return Err(LayoutError::OutOfBounds {
                    id: format!("{:?}", entry.id),
                    pos: entry.pos,
                    span: entry.span,
                });
            }
        }
        let all: Vec<_> = self.entries.values().collect();
        for (i, first) in all.iter().enumerate() {
            if let Some(second) = all[i + 1..].iter().find(|other| first.overlaps(other)) {
                return Err(LayoutError::Overlap {
                    first: format!("{:?}", first.id),
                    second: format!("{:?}", second.id),
                });
            }
        }
        Ok(())
    }
}
