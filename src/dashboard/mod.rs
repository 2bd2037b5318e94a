//! Terminal dashboard hosting the layout engine.
//!
//! The dashboard owns the authoritative placements and the kind of every
//! widget. Terminal mouse events become engine pointer calls, and the
//! effects that come back are applied to the placements and to the
//! transient session visuals the renderer draws.

mod render;

use std::collections::BTreeMap;

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::catalog::WidgetKind;
use crate::config::DashboardConfig;
use crate::constants::ROW_PIXEL_SCALE;
use crate::engine::LayoutEngine;
use crate::event_loop::ControlFlow;
use crate::grid::{GridConfig, PixelPoint, PixelRect, Position, Span};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::Placements;
use crate::session::{Effect, PointerButton, PressOrigin, SessionState};
use crate::state::InteractionFlags;

pub type WidgetId = u32;

/// What part of a widget a terminal cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Body,
    ResizeHandle,
    RemoveControl,
}

/// Transient presentation of the running session.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionVisual {
    None,
    Drag {
        id: WidgetId,
        floating: PixelRect,
        preview: Option<(Position, PixelRect)>,
    },
    Resize {
        id: WidgetId,
        span: Span,
        valid: bool,
    },
}

pub struct Dashboard {
    template: GridConfig,
    grid: GridConfig,
    placements: Placements<WidgetId>,
    kinds: BTreeMap<WidgetId, WidgetKind>,
    engine: LayoutEngine<WidgetId>,
    flags: InteractionFlags,
    keys: KeyBindings,
    next_id: WidgetId,
    selected_kind: WidgetKind,
    last_touched: Option<WidgetId>,
    session: SessionState<WidgetId>,
    visual: SessionVisual,
    status: String,
}

/// Layout pixel under the center of a terminal cell.
pub fn pointer_at(column: u16, row: u16) -> PixelPoint {
    PixelPoint::new(
        f64::from(column) + 0.5,
        (f64::from(row) + 0.5) * ROW_PIXEL_SCALE,
    )
}

/// Terminal cells covered by a layout rectangle. Parts left of or above the
/// terminal origin are cut off.
pub fn to_cell_rect(rect: PixelRect) -> Option<Rect> {
    let x0 = rect.x.round().max(0.0);
    let y0 = (rect.y / ROW_PIXEL_SCALE).round().max(0.0);
    let x1 = rect.right().round().min(f64::from(u16::MAX));
    let y1 = (rect.bottom() / ROW_PIXEL_SCALE).round().min(f64::from(u16::MAX));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(
        x0 as u16,
        y0 as u16,
        (x1 - x0) as u16,
        (y1 - y0) as u16,
    ))
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
    }
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        let mut engine = LayoutEngine::new(config.engine);
        engine.set_drag_enabled(config.drag_enabled);
        engine.set_resize_enabled(config.resize_enabled);
        Self {
            template: config.grid,
            grid: config.grid,
            placements: Placements::new(),
            kinds: BTreeMap::new(),
            engine,
            flags: InteractionFlags::new(config.drag_enabled, config.resize_enabled),
            keys: KeyBindings::default(),
            next_id: 1,
            selected_kind: WidgetKind::ALL[0],
            last_touched: None,
            session: SessionState::Idle,
            visual: SessionVisual::None,
            status: String::from("press n to add a widget, ? for help"),
        }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn placements(&self) -> &Placements<WidgetId> {
        &self.placements
    }

    pub fn kind_of(&self, id: WidgetId) -> Option<WidgetKind> {
        self.kinds.get(&id).copied()
    }

    pub fn session(&self) -> SessionState<WidgetId> {
        self.session
    }

    pub fn flags(&self) -> &InteractionFlags {
        &self.flags
    }

    pub fn selected_kind(&self) -> WidgetKind {
        self.selected_kind
    }

    pub fn select_kind(&mut self, kind: WidgetKind) {
        self.selected_kind = kind;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Lays the grid out inside `area`, horizontally centered above the
    /// status bar. Called on start-up and whenever the terminal resizes.
    pub fn set_viewport(&mut self, area: Rect) {
        let bounds = self.template.bounds();
        let spare = (f64::from(area.width) - bounds.width).max(0.0);
        let origin = PixelPoint::new(
            f64::from(area.x) + (spare / 2.0).floor(),
            f64::from(area.y) * ROW_PIXEL_SCALE,
        );
        self.grid = self.template.with_origin(origin);
        tracing::debug!(
            width = area.width,
            height = area.height,
            origin_x = origin.x,
            "grid relaid out"
        );
    }

    /// Places a new widget of the selected kind at the first free slot.
    pub fn add_widget(&mut self) -> Option<WidgetId> {
        let kind = self.selected_kind;
        let span = kind.default_span();
        let id = self.next_id;
        match self.placements.insert_first_fit(id, span, &self.grid) {
            Some(pos) => {
                self.next_id += 1;
                self.kinds.insert(id, kind);
                self.last_touched = Some(id);
                self.status = format!("added {kind} at row {} col {}", pos.row, pos.col);
                Some(id)
            }
            None => {
                self.status = format!("no room for {kind} ({}x{})", span.x, span.y);
                None
            }
        }
    }

    pub fn remove_widget(&mut self, id: WidgetId) -> bool {
        if self.placements.remove(id).is_none() {
            return false;
        }
        self.kinds.remove(&id);
        if self.last_touched == Some(id) {
            self.last_touched = None;
        }
        self.status = format!("removed widget {id}");
        tracing::debug!(widget_id = id, "widget removed");
        true
    }

    /// Terminal cells a widget currently occupies.
    pub fn widget_area(&self, id: WidgetId) -> Option<Rect> {
        let placement = self.placements.get(id)?;
        to_cell_rect(self.grid.placement_rect(placement.pos, placement.span))
    }

    fn handle_cell(area: Rect) -> (u16, u16) {
        (
            area.x.saturating_add(area.width.saturating_sub(1)),
            area.y.saturating_add(area.height.saturating_sub(1)),
        )
    }

    /// `[x]` sits on the top border, one cell in from the right corner.
    fn remove_control_cells(area: Rect) -> Option<(u16, u16)> {
        if area.width < 6 {
            return None;
        }
        let right = area.x + area.width - 1;
        Some((right - 3, right - 1))
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<(WidgetId, Hit)> {
        self.placements.iter().find_map(|placement| {
            let area = self.widget_area(placement.id)?;
            let inside = column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height;
            if !inside {
                return None;
            }
            if self.flags.resize_enabled() && (column, row) == Self::handle_cell(area) {
                return Some((placement.id, Hit::ResizeHandle));
            }
            if row == area.y
                && let Some((start, end)) = Self::remove_control_cells(area)
                && (start..=end).contains(&column)
            {
                return Some((placement.id, Hit::RemoveControl));
            }
            Some((placement.id, Hit::Body))
        })
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.set_viewport(Rect::new(0, 0, *width, *height)),
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        let Some(action) = self.keys.action_for(key) else {
            return ControlFlow::Continue;
        };
        if self.flags.help_visible() && !matches!(action, Action::Quit) {
            self.flags.set_help_visible(false);
            return ControlFlow::Continue;
        }
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::NewWidget => {
                self.add_widget();
            }
            Action::NextKind | Action::PrevKind => {
                self.selected_kind = self.selected_kind.cycle(action == Action::NextKind);
                self.status = format!("selected {}", self.selected_kind);
            }
            Action::RemoveWidget => match self.last_touched {
                Some(id) => {
                    self.remove_widget(id);
                }
                None => self.status = String::from("no widget selected"),
            },
            Action::ToggleDrag => self.flags.toggle_drag(),
            Action::ToggleResize => self.flags.toggle_resize(),
            Action::ToggleGrid => self.flags.toggle_grid(),
            Action::ToggleHelp => self.flags.toggle_help(),
            Action::CloseHelp => self.flags.set_help_visible(false),
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let pointer = pointer_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => self.pointer_down(mouse.column, mouse.row, button),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => self.engine.pointer_moved(pointer),
            MouseEventKind::Up(_) => {
                let placements = self.placements.to_vec();
                let effects = self.engine.pointer_up(&self.grid, &placements);
                self.apply(effects);
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16, button: MouseButton) {
        if !self.engine.session().is_idle() {
            return;
        }
        let Some((id, hit)) = self.hit_test(column, row) else {
            return;
        };
        self.last_touched = Some(id);
        let pointer = pointer_at(column, row);
        let button = pointer_button(button);
        let placements = self.placements.to_vec();
        let effects = match hit {
            Hit::ResizeHandle => {
                let catalog = self.kind_of(id).map(WidgetKind::catalog).unwrap_or_default();
                self.engine
                    .begin_resize(id, pointer, button, catalog, &placements)
            }
            Hit::RemoveControl => {
                if button == PointerButton::Left {
                    self.remove_widget(id);
                }
                Vec::new()
            }
            Hit::Body => self.engine.begin_drag(
                id,
                pointer,
                button,
                PressOrigin::Widget,
                &self.grid,
                &placements,
            ),
        };
        self.apply(effects);
    }

    /// One frame: forward capability changes, then run at most one pointer
    /// step.
    pub fn tick(&mut self) {
        if let Some(enabled) = self.flags.take_drag_change() {
            let effects = self.engine.set_drag_enabled(enabled);
            self.apply(effects);
            self.status = format!("dragging {}", if enabled { "on" } else { "off" });
        }
        if let Some(enabled) = self.flags.take_resize_change() {
            let effects = self.engine.set_resize_enabled(enabled);
            self.apply(effects);
            self.status = format!("resizing {}", if enabled { "on" } else { "off" });
        }
        let effects = self.engine.frame(&self.grid);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect<WidgetId>>) {
        for effect in effects {
            match effect {
                Effect::SessionChanged(state) => {
                    self.session = state;
                    self.visual = match state {
                        SessionState::Idle => SessionVisual::None,
                        SessionState::Dragging(id) => SessionVisual::Drag {
                            id,
                            floating: self.current_rect(id),
                            preview: None,
                        },
                        SessionState::Resizing(id) => SessionVisual::Resize {
                            id,
                            span: self
                                .placements
                                .get(id)
                                .map(|p| p.span)
                                .unwrap_or(Span::new(1, 1)),
                            valid: true,
                        },
                    };
                }
                Effect::DragMoved { id, rect } => {
                    if let SessionVisual::Drag {
                        id: active,
                        floating,
                        ..
                    } = &mut self.visual
                        && *active == id
                    {
                        *floating = rect;
                    }
                }
                Effect::DragPreview { id, cell, rect } => {
                    if let SessionVisual::Drag {
                        id: active,
                        preview,
                        ..
                    } = &mut self.visual
                        && *active == id
                    {
                        *preview = Some((cell, rect));
                    }
                }
                Effect::ResizePreview { id, span, valid } => {
                    self.visual = SessionVisual::Resize { id, span, valid };
                }
                Effect::CommitPosition { id, pos } => {
                    if self.placements.apply(&effect) {
                        self.status = format!("moved widget {id} to row {} col {}", pos.row, pos.col);
                    }
                }
                Effect::CommitSpan { id, span } => {
                    if self.placements.apply(&effect) {
                        self.status = format!("resized widget {id} to {}x{}", span.x, span.y);
                    }
                }
                Effect::Reverted { id, .. } => {
                    self.status = format!("widget {id} left in place");
                }
            }
        }
    }

    fn current_rect(&self, id: WidgetId) -> PixelRect {
        self.placements
            .get(id)
            .map(|p| self.grid.placement_rect(p.pos, p.span))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyModifiers};

    use crate::config::Cli;

    // Default grid: 4x6 cells of 12px with 2px gaps. In an 100x30 terminal
    // it is centered at column 9, so cell (1,1) covers columns 9..21 and rows
    // 0..6, and each further column starts 14 terminal columns later.
    fn dashboard() -> Dashboard {
        let cli = Cli::parse_from(["widget-grid"]);
        let config = DashboardConfig::try_from(&cli).unwrap();
        let mut dash = Dashboard::new(&config);
        dash.set_viewport(Rect::new(0, 0, 100, 30));
        dash
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn viewport_centers_grid() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        assert_eq!(dash.widget_area(id), Some(Rect::new(9, 0, 12, 6)));
    }

    #[test]
    fn new_widget_key_uses_selected_kind() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Checklist);
        dash.handle_event(&key('n'));
        assert_eq!(dash.placements().len(), 1);
        let placement = dash.placements().iter().next().copied().unwrap();
        assert_eq!(placement.span, Span::new(2, 2));
        assert_eq!(dash.kind_of(placement.id), Some(WidgetKind::Checklist));
    }

    #[test]
    fn full_grid_reports_no_room() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Checklist);
        for _ in 0..6 {
            dash.add_widget();
        }
        assert_eq!(dash.placements().len(), 6);
        assert!(dash.add_widget().is_none());
        assert!(dash.status().starts_with("no room"));
    }

    #[test]
    fn mouse_drag_moves_widget() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 3));
        assert_eq!(dash.session(), SessionState::Dragging(id));
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 3));
        dash.tick();
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 3));
        assert!(dash.session().is_idle());
        assert_eq!(dash.placements().get(id).unwrap().pos, Position::new(1, 3));
    }

    #[test]
    fn mouse_resize_from_handle_grows_span() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        assert_eq!(dash.hit_test(20, 5), Some((id, Hit::ResizeHandle)));
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 20, 5));
        assert_eq!(dash.session(), SessionState::Resizing(id));
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 34, 12));
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 34, 12));
        assert_eq!(dash.placements().get(id).unwrap().span, Span::new(2, 2));
    }

    #[test]
    fn toggling_drag_mid_session_reverts() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 3));
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 3));
        dash.tick();
        dash.handle_event(&key('d'));
        dash.tick();
        assert!(dash.session().is_idle());
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 3));
        assert_eq!(dash.placements().get(id).unwrap().pos, Position::new(1, 1));
        assert!(!dash.flags().drag_enabled());
    }

    #[test]
    fn remove_control_deletes_widget_without_dragging() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        assert_eq!(dash.hit_test(18, 0), Some((id, Hit::RemoveControl)));
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 18, 0));
        assert!(dash.placements().is_empty());
        assert!(dash.session().is_idle());
    }

    #[test]
    fn remove_control_ignores_other_buttons() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let id = dash.add_widget().unwrap();
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right), 18, 0));
        assert!(dash.placements().get(id).is_some());
        assert!(dash.session().is_idle());
    }

    #[test]
    fn remove_key_targets_last_touched_widget() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Note);
        let first = dash.add_widget().unwrap();
        let second = dash.add_widget().unwrap();
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 3));
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 12, 3));
        dash.handle_event(&key('x'));
        assert!(dash.placements().get(first).is_none());
        assert!(dash.placements().get(second).is_some());
    }

    #[test]
    fn terminal_resize_moves_grid_origin() {
        let mut dash = dashboard();
        dash.handle_event(&Event::Resize(120, 40));
        assert_eq!(dash.grid().bounds().x, 19.0);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut dash = dashboard();
        dash.handle_event(&key('?'));
        assert!(dash.flags().help_visible());
        dash.handle_event(&key('n'));
        assert!(!dash.flags().help_visible());
        assert!(dash.placements().is_empty());
        assert_eq!(dash.handle_event(&key('q')), ControlFlow::Quit);
    }
}
