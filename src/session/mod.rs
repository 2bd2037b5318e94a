//! Interactive drag and resize sessions.
//!
//! Each session is an explicit state machine: pointer input goes in, a list
//! of [`Effect`]s comes out. Sessions never touch the placement collection
//! directly; the host applies the commit effects it receives.

pub mod drag;
pub mod frame;
pub mod resize;

pub use drag::{DragSession, best_overlap_cell};
pub use frame::MoveCoalescer;
pub use resize::{ResizeSession, SpanChoice, resolve_span};

use crate::grid::{PixelRect, Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Where on a widget a drag press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOrigin {
    /// The widget body or its chrome.
    Widget,
    /// A control inside the widget (button, input, scroll area) that keeps
    /// pointer input for itself.
    InteractiveChild,
}

/// Which session, if any, currently owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<Id> {
    Idle,
    Dragging(Id),
    Resizing(Id),
}

impl<Id: Copy> SessionState<Id> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn widget(&self) -> Option<Id> {
        match *self {
            Self::Idle => None,
            Self::Dragging(id) | Self::Resizing(id) => Some(id),
        }
    }
}

/// Output of a session step, for the host to render or persist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect<Id> {
    SessionChanged(SessionState<Id>),
    /// The floating widget box follows the pointer.
    DragMoved { id: Id, rect: PixelRect },
    /// The snap target changed; `rect` is where the widget would land.
    DragPreview { id: Id, cell: Position, rect: PixelRect },
    /// The tentative span changed. `valid` is false when a collision forced
    /// a smaller span than the pointer asked for.
    ResizePreview { id: Id, span: Span, valid: bool },
    CommitPosition { id: Id, pos: Position },
    CommitSpan { id: Id, span: Span },
    /// The session ended without a commit; restore the widget's pre-session
    /// presentation.
    Reverted { id: Id, pos: Position, span: Span },
}

impl<Id: Copy> Effect<Id> {
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::CommitPosition { .. } | Self::CommitSpan { .. })
    }
}
