use std::fmt::Debug;

use crate::catalog::SpanCatalog;
use crate::grid::{GridConfig, PixelPoint, Position, Span, WidgetPlacement};
use crate::layout::{OccupancyIndex, is_valid};

use super::{Effect, SessionState};

/// The span a resize step settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanChoice {
    pub span: Span,
    /// True when `span` is what the pointer asked for; false when a
    /// collision forced a fallback.
    pub valid: bool,
}

/// Converts a pixel drag distance into whole cells, rounding halves up.
pub fn cells_for_delta(delta_px: f64, pitch: f64) -> i32 {
    (delta_px / pitch + 0.5).floor() as i32
}

fn grow(base: u16, delta: i32, max: u16) -> u16 {
    let grown = (i32::from(base) + delta).clamp(1, i32::from(max.max(1)));
    grown as u16
}

/// Resolves the span for a widget anchored at `pos` after the pointer moved
/// `delta` cells from where the resize began.
pub fn resolve_span(
    grid: &GridConfig,
    index: &OccupancyIndex,
    pos: Position,
    initial: Span,
    delta: (i32, i32),
    catalog: &SpanCatalog,
) -> SpanChoice {
    let max = grid.max_span_at(pos);
    let candidate = Span::new(grow(initial.x, delta.0, max.x), grow(initial.y, delta.1, max.y));
    let (row, col) = (i32::from(pos.row), i32::from(pos.col));
    let fits = |span: Span| is_valid(grid, index, row, col, span);

    if let SpanCatalog::Allowed(spans) = catalog {
        let in_bounds = || spans.iter().copied().filter(|s| s.x <= max.x && s.y <= max.y);
        let requested = in_bounds().min_by_key(|s| s.distance(candidate));
        let mut best: Option<(Span, u32)> = None;
        for span in in_bounds().filter(|s| fits(*s)) {
            let dist = span.distance(candidate);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((span, dist));
            }
        }
        return match best {
            Some((span, _)) => SpanChoice {
                span,
                valid: requested == Some(span),
            },
            None => SpanChoice {
                span: initial,
                valid: false,
            },
        };
    }

    if fits(candidate) {
        return SpanChoice {
            span: candidate,
            valid: true,
        };
    }

    let mut valid_x = initial.x;
    for x in initial.x..=candidate.x {
        if !fits(Span::new(x, initial.y)) {
            break;
        }
        valid_x = x;
    }
    let mut valid_y = initial.y;
    for y in initial.y..=candidate.y {
        if !fits(Span::new(initial.x, y)) {
            break;
        }
        valid_y = y;
    }
    let partial = Span::new(valid_x, valid_y);
    let span = if fits(partial) { partial } else { initial };
    SpanChoice { span, valid: false }
}

/// A widget being resized from its bottom-right handle. The top-left cell
/// stays put for the whole session.
#[derive(Debug, Clone)]
pub struct ResizeSession<Id> {
    id: Id,
    pos: Position,
    initial: Span,
    start: PixelPoint,
    index: OccupancyIndex,
    catalog: SpanCatalog,
    current: SpanChoice,
}

impl<Id: Copy + Eq + Debug> ResizeSession<Id> {
    pub fn start(
        widget: WidgetPlacement<Id>,
        pointer: PixelPoint,
        catalog: SpanCatalog,
        placements: &[WidgetPlacement<Id>],
    ) -> (Self, Vec<Effect<Id>>) {
        let session = Self {
            id: widget.id,
            pos: widget.pos,
            initial: widget.span,
            start: pointer,
            index: OccupancyIndex::build(placements, Some(&widget.id)),
            catalog,
            current: SpanChoice {
                span: widget.span,
                valid: true,
            },
        };
        tracing::debug!(widget_id = ?widget.id, span = ?widget.span, "resize started");
        (
            session,
            vec![Effect::SessionChanged(SessionState::Resizing(widget.id))],
        )
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn current(&self) -> SpanChoice {
        self.current
    }

    /// Applies one coalesced pointer move. Emits a preview only when the
    /// span or its validity changed.
    pub fn update(&mut self, pointer: PixelPoint, grid: &GridConfig) -> Vec<Effect<Id>> {
        let pitch = grid.pitch();
        let delta = (
            cells_for_delta(pointer.x - self.start.x, pitch),
            cells_for_delta(pointer.y - self.start.y, pitch),
        );
        let choice = resolve_span(grid, &self.index, self.pos, self.initial, delta, &self.catalog);
        if choice == self.current {
            return Vec::new();
        }
        self.current = choice;
        vec![Effect::ResizePreview {
            id: self.id,
            span: choice.span,
            valid: choice.valid,
        }]
    }

    /// Ends the resize. Commits only a changed span that still fits against
    /// the current `placements`.
    pub fn finish(self, grid: &GridConfig, placements: &[WidgetPlacement<Id>]) -> Vec<Effect<Id>> {
        let span = self.current.span;
        if span == self.initial {
            tracing::debug!(widget_id = ?self.id, "resize ended without change");
            return vec![Effect::SessionChanged(SessionState::Idle)];
        }
        let fresh = OccupancyIndex::build(placements, Some(&self.id));
        let (row, col) = (i32::from(self.pos.row), i32::from(self.pos.col));
        if !is_valid(grid, &fresh, row, col, span) {
            tracing::debug!(widget_id = ?self.id, ?span, "resize target went stale, reverting");
            return vec![
                Effect::Reverted {
                    id: self.id,
                    pos: self.pos,
                    span: self.initial,
                },
                Effect::SessionChanged(SessionState::Idle),
            ];
        }
        tracing::debug!(widget_id = ?self.id, ?span, "resize committed");
        vec![
            Effect::CommitSpan { id: self.id, span },
            Effect::SessionChanged(SessionState::Idle),
        ]
    }

    pub fn cancel(self) -> Vec<Effect<Id>> {
        tracing::debug!(widget_id = ?self.id, "resize cancelled");
        vec![
            Effect::Reverted {
                id: self.id,
                pos: self.pos,
                span: self.initial,
            },
            Effect::SessionChanged(SessionState::Idle),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridConfig {
        GridConfig::new(4, 6, 120.0, 10.0).unwrap()
    }

    fn blocked_at(row: u16, col: u16) -> OccupancyIndex {
        let placements = [WidgetPlacement::new(9u8, Position::new(row, col), Span::new(1, 1))];
        OccupancyIndex::build(&placements, None)
    }

    #[test]
    fn cell_delta_rounds_to_nearest() {
        assert_eq!(cells_for_delta(64.0, 130.0), 0);
        assert_eq!(cells_for_delta(65.0, 130.0), 1);
        assert_eq!(cells_for_delta(-64.0, 130.0), 0);
        assert_eq!(cells_for_delta(-200.0, 130.0), -2);
    }

    #[test]
    fn free_form_grows_when_clear() {
        let g = grid();
        let choice = resolve_span(
            &g,
            &OccupancyIndex::default(),
            Position::new(1, 1),
            Span::new(1, 1),
            (2, 1),
            &SpanCatalog::Unrestricted,
        );
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(3, 2),
                valid: true
            }
        );
    }

    #[test]
    fn free_form_clamps_to_grid_edge() {
        let g = grid();
        let choice = resolve_span(
            &g,
            &OccupancyIndex::default(),
            Position::new(3, 5),
            Span::new(1, 1),
            (10, 10),
            &SpanCatalog::Unrestricted,
        );
        assert_eq!(choice.span, Span::new(2, 2));
        assert!(choice.valid);
    }

    #[test]
    fn free_form_never_shrinks_below_one() {
        let g = grid();
        let choice = resolve_span(
            &g,
            &OccupancyIndex::default(),
            Position::new(1, 1),
            Span::new(2, 2),
            (-5, -5),
            &SpanCatalog::Unrestricted,
        );
        assert_eq!(choice.span, Span::new(1, 1));
    }

    #[test]
    fn free_form_grows_each_axis_to_last_valid() {
        let g = grid();
        // Widget at (1,1); blocker at (3,3) stops the 3x3 candidate.
        let index = blocked_at(3, 3);
        let choice = resolve_span(
            &g,
            &index,
            Position::new(1, 1),
            Span::new(1, 1),
            (2, 2),
            &SpanCatalog::Unrestricted,
        );
        // Each axis alone reaches 3, but 3x3 collides and so does the pair.
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(1, 1),
                valid: false
            }
        );

        let index = blocked_at(1, 3);
        let choice = resolve_span(
            &g,
            &index,
            Position::new(1, 1),
            Span::new(1, 1),
            (2, 1),
            &SpanCatalog::Unrestricted,
        );
        // Columns stop at 2; rows reach 2 freely; 2x2 fits.
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(2, 2),
                valid: false
            }
        );
    }

    #[test]
    fn catalog_falls_back_to_nearest_free_entry() {
        let g = grid();
        let catalog = SpanCatalog::allowed([Span::new(1, 1), Span::new(2, 2)]);
        let choice = resolve_span(
            &g,
            &blocked_at(3, 3),
            Position::new(2, 2),
            Span::new(1, 1),
            (1, 1),
            &catalog,
        );
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(1, 1),
                valid: false
            }
        );
    }

    #[test]
    fn catalog_snaps_to_nearest_entry() {
        let g = grid();
        let catalog = SpanCatalog::allowed([Span::new(1, 1), Span::new(2, 2), Span::new(3, 3)]);
        let choice = resolve_span(
            &g,
            &OccupancyIndex::default(),
            Position::new(1, 1),
            Span::new(1, 1),
            (1, 2),
            &catalog,
        );
        // Candidate 2x3 is one away from both 2x2 and 3x3; the earlier entry wins.
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(2, 2),
                valid: true
            }
        );
    }

    #[test]
    fn catalog_without_room_keeps_initial() {
        let g = grid();
        let catalog = SpanCatalog::allowed([Span::new(2, 2)]);
        let choice = resolve_span(
            &g,
            &OccupancyIndex::default(),
            Position::new(4, 6),
            Span::new(1, 1),
            (1, 1),
            &catalog,
        );
        assert_eq!(
            choice,
            SpanChoice {
                span: Span::new(1, 1),
                valid: false
            }
        );
    }

    #[test]
    fn unchanged_span_finishes_without_commit() {
        let g = grid();
        let widget = WidgetPlacement::new(1u8, Position::new(2, 2), Span::new(1, 1));
        let blocker = WidgetPlacement::new(2u8, Position::new(3, 3), Span::new(1, 1));
        let placements = [widget, blocker];
        let (mut session, _) = ResizeSession::start(
            widget,
            PixelPoint::new(250.0, 250.0),
            SpanCatalog::allowed([Span::new(1, 1), Span::new(2, 2)]),
            &placements,
        );
        let effects = session.update(PixelPoint::new(380.0, 380.0), &g);
        assert_eq!(
            effects,
            vec![Effect::ResizePreview {
                id: 1,
                span: Span::new(1, 1),
                valid: false
            }]
        );
        let effects = session.finish(&g, &placements);
        assert!(!effects.iter().any(Effect::is_commit));
    }

    #[test]
    fn changed_span_commits_after_revalidation() {
        let g = grid();
        let widget = WidgetPlacement::new(1u8, Position::new(1, 1), Span::new(1, 1));
        let (mut session, _) = ResizeSession::start(
            widget,
            PixelPoint::new(110.0, 110.0),
            SpanCatalog::Unrestricted,
            &[widget],
        );
        session.update(PixelPoint::new(240.0, 110.0), &g);
        assert_eq!(session.current().span, Span::new(2, 1));

        let effects = session.clone().finish(&g, &[widget]);
        assert_eq!(
            effects[0],
            Effect::CommitSpan {
                id: 1,
                span: Span::new(2, 1)
            }
        );

        let intruder = WidgetPlacement::new(2u8, Position::new(1, 2), Span::new(1, 1));
        let effects = session.finish(&g, &[widget, intruder]);
        assert!(matches!(effects[0], Effect::Reverted { .. }));
    }
}
