//! The layout engine: owns at most one interactive session and turns host
//! pointer input into [`Effect`]s.
//!
//! The engine never stores placements. Every call that needs them takes the
//! host's current snapshot, so commit-time validation always runs against
//! fresh state.

use std::fmt::Debug;

use crate::catalog::SpanCatalog;
use crate::constants::{DRAG_MOVE_THRESHOLD_PX, SNAP_RADIUS_PADDING};
use crate::grid::{GridConfig, PixelPoint, WidgetPlacement};
use crate::session::{
    DragSession, Effect, MoveCoalescer, PointerButton, PressOrigin, ResizeSession, SessionState,
};

/// Tuning knobs for interactive sessions. Neither value affects correctness,
/// only how eagerly the drag preview follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub move_threshold: f64,
    pub snap_radius_padding: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_threshold: DRAG_MOVE_THRESHOLD_PX,
            snap_radius_padding: SNAP_RADIUS_PADDING,
        }
    }
}

#[derive(Debug, Clone)]
enum ActiveSession<Id> {
    Idle,
    Drag(DragSession<Id>),
    Resize(ResizeSession<Id>),
}

#[derive(Debug, Clone)]
pub struct LayoutEngine<Id> {
    config: EngineConfig,
    drag_enabled: bool,
    resize_enabled: bool,
    active: ActiveSession<Id>,
    pending: MoveCoalescer,
}

impl<Id: Copy + Eq + Ord + Debug> Default for LayoutEngine<Id> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<Id: Copy + Eq + Ord + Debug> LayoutEngine<Id> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            drag_enabled: true,
            resize_enabled: true,
            active: ActiveSession::Idle,
            pending: MoveCoalescer::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn session(&self) -> SessionState<Id> {
        match &self.active {
            ActiveSession::Idle => SessionState::Idle,
            ActiveSession::Drag(drag) => SessionState::Dragging(drag.id()),
            ActiveSession::Resize(resize) => SessionState::Resizing(resize.id()),
        }
    }

    pub fn drag_session(&self) -> Option<&DragSession<Id>> {
        match &self.active {
            ActiveSession::Drag(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    pub fn resize_enabled(&self) -> bool {
        self.resize_enabled
    }

    /// Enables or disables dragging. Disabling during a drag aborts it and
    /// reverts the widget without a commit.
    pub fn set_drag_enabled(&mut self, enabled: bool) -> Vec<Effect<Id>> {
        self.drag_enabled = enabled;
        if !enabled && matches!(self.active, ActiveSession::Drag(_)) {
            return self.cancel();
        }
        Vec::new()
    }

    /// Enables or disables resizing. Disabling during a resize aborts it and
    /// reverts the widget without a commit.
    pub fn set_resize_enabled(&mut self, enabled: bool) -> Vec<Effect<Id>> {
        self.resize_enabled = enabled;
        if !enabled && matches!(self.active, ActiveSession::Resize(_)) {
            return self.cancel();
        }
        Vec::new()
    }

    fn find(id: Id, placements: &[WidgetPlacement<Id>]) -> Option<WidgetPlacement<Id>> {
        placements.iter().find(|p| p.id == id).copied()
    }

    /// Pointer pressed on a widget body. No-op unless dragging is enabled,
    /// the left button is used, the press did not start on an interactive
    /// child, and no other session is running.
    pub fn begin_drag(
        &mut self,
        id: Id,
        pointer: PixelPoint,
        button: PointerButton,
        origin: PressOrigin,
        grid: &GridConfig,
        placements: &[WidgetPlacement<Id>],
    ) -> Vec<Effect<Id>> {
        if !self.drag_enabled
            || button != PointerButton::Left
            || origin == PressOrigin::InteractiveChild
            || !self.session().is_idle()
        {
            return Vec::new();
        }
        let Some(widget) = Self::find(id, placements) else {
            tracing::debug!(widget_id = ?id, "drag ignored for unknown widget");
            return Vec::new();
        };
        let (session, effects) = DragSession::start(widget, pointer, grid, placements, self.config);
        self.active = ActiveSession::Drag(session);
        self.pending.clear();
        effects
    }

    /// Pointer pressed on a widget's resize handle.
    pub fn begin_resize(
        &mut self,
        id: Id,
        pointer: PixelPoint,
        button: PointerButton,
        catalog: SpanCatalog,
        placements: &[WidgetPlacement<Id>],
    ) -> Vec<Effect<Id>> {
        if !self.resize_enabled || button != PointerButton::Left || !self.session().is_idle() {
            return Vec::new();
        }
        let Some(widget) = Self::find(id, placements) else {
            tracing::debug!(widget_id = ?id, "resize ignored for unknown widget");
            return Vec::new();
        };
        let (session, effects) = ResizeSession::start(widget, pointer, catalog, placements);
        self.active = ActiveSession::Resize(session);
        self.pending.clear();
        effects
    }

    /// Records a pointer move. Work happens on the next [`LayoutEngine::frame`].
    pub fn pointer_moved(&mut self, pointer: PixelPoint) {
        if !self.session().is_idle() {
            self.pending.push(pointer);
        }
    }

    /// Runs at most one layout step with the newest queued pointer move.
    pub fn frame(&mut self, grid: &GridConfig) -> Vec<Effect<Id>> {
        let Some(pointer) = self.pending.take() else {
            return Vec::new();
        };
        match &mut self.active {
            ActiveSession::Idle => Vec::new(),
            ActiveSession::Drag(drag) => drag.update(pointer, grid),
            ActiveSession::Resize(resize) => resize.update(pointer, grid),
        }
    }

    /// Pointer released. Processes any move still queued, then commits the
    /// session against the host's current placements.
    pub fn pointer_up(
        &mut self,
        grid: &GridConfig,
        placements: &[WidgetPlacement<Id>],
    ) -> Vec<Effect<Id>> {
        let mut effects = self.frame(grid);
        match std::mem::replace(&mut self.active, ActiveSession::Idle) {
            ActiveSession::Idle => {}
            ActiveSession::Drag(drag) => {
                if Self::find(drag.id(), placements).is_some() {
                    effects.extend(drag.finish(grid, placements));
                } else {
                    tracing::debug!(widget_id = ?drag.id(), "dragged widget removed mid-session");
                    effects.extend(drag.cancel());
                }
            }
            ActiveSession::Resize(resize) => {
                if Self::find(resize.id(), placements).is_some() {
                    effects.extend(resize.finish(grid, placements));
                } else {
                    tracing::debug!(widget_id = ?resize.id(), "resized widget removed mid-session");
                    effects.extend(resize.cancel());
                }
            }
        }
        self.pending.clear();
        effects
    }

    /// Aborts whatever session is running without committing.
    pub fn cancel(&mut self) -> Vec<Effect<Id>> {
        self.pending.clear();
        match std::mem::replace(&mut self.active, ActiveSession::Idle) {
            ActiveSession::Idle => Vec::new(),
            ActiveSession::Drag(drag) => drag.cancel(),
            ActiveSession::Resize(resize) => resize.cancel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Position, Span};

    fn grid() -> GridConfig {
        GridConfig::new(4, 6, 120.0, 10.0).unwrap()
    }

    fn widget(id: u32, row: u16, col: u16, x: u16, y: u16) -> WidgetPlacement<u32> {
        WidgetPlacement::new(id, Position::new(row, col), Span::new(x, y))
    }

    #[test]
    fn only_left_button_starts_drag() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        let effects = engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Right,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        assert!(effects.is_empty());
        assert!(engine.session().is_idle());
    }

    #[test]
    fn interactive_child_press_does_not_drag() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::InteractiveChild,
            &g,
            &placements,
        );
        assert!(engine.session().is_idle());
    }

    #[test]
    fn second_session_is_a_no_op() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1), widget(2, 1, 2, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        let effects = engine.begin_resize(
            2,
            PixelPoint::new(240.0, 110.0),
            PointerButton::Left,
            SpanCatalog::Unrestricted,
            &placements,
        );
        assert!(effects.is_empty());
        assert_eq!(engine.session(), SessionState::Dragging(1));
    }

    #[test]
    fn disabled_drag_does_not_start() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        assert!(engine.set_drag_enabled(false).is_empty());
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        assert!(engine.session().is_idle());
    }

    #[test]
    fn frame_processes_only_latest_move() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        engine.pointer_moved(PixelPoint::new(400.0, 400.0));
        engine.pointer_moved(PixelPoint::new(140.0, 10.0));
        let effects = engine.frame(&g);
        let moved: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::DragMoved { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].x, 130.0);
        assert!(engine.frame(&g).is_empty());
    }

    #[test]
    fn pointer_up_flushes_pending_move_before_commit() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        engine.pointer_moved(PixelPoint::new(10.0 + 390.0, 10.0 + 130.0));
        let effects = engine.pointer_up(&g, &placements);
        assert!(effects.contains(&Effect::CommitPosition {
            id: 1,
            pos: Position::new(2, 4)
        }));
        assert_eq!(effects.last(), Some(&Effect::SessionChanged(SessionState::Idle)));
        assert!(engine.session().is_idle());
    }

    #[test]
    fn removed_widget_is_not_committed() {
        let g = grid();
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_drag(
            1,
            PixelPoint::new(10.0, 10.0),
            PointerButton::Left,
            PressOrigin::Widget,
            &g,
            &placements,
        );
        let effects = engine.pointer_up(&g, &[]);
        assert!(!effects.iter().any(Effect::is_commit));
    }

    #[test]
    fn disabling_resize_mid_session_reverts() {
        let placements = [widget(1, 1, 1, 1, 1)];
        let g = grid();
        let mut engine = LayoutEngine::default();
        engine.begin_resize(
            1,
            PixelPoint::new(110.0, 110.0),
            PointerButton::Left,
            SpanCatalog::Unrestricted,
            &placements,
        );
        engine.pointer_moved(PixelPoint::new(370.0, 370.0));
        engine.frame(&g);
        let effects = engine.set_resize_enabled(false);
        assert_eq!(
            effects,
            vec![
                Effect::Reverted {
                    id: 1,
                    pos: Position::new(1, 1),
                    span: Span::new(1, 1)
                },
                Effect::SessionChanged(SessionState::Idle),
            ]
        );
        assert!(engine.session().is_idle());
    }

    #[test]
    fn disabling_other_capability_keeps_session() {
        let placements = [widget(1, 1, 1, 1, 1)];
        let mut engine = LayoutEngine::default();
        engine.begin_resize(
            1,
            PixelPoint::new(110.0, 110.0),
            PointerButton::Left,
            SpanCatalog::Unrestricted,
            &placements,
        );
        assert!(engine.set_drag_enabled(false).is_empty());
        assert_eq!(engine.session(), SessionState::Resizing(1));
    }
}
