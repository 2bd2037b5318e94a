//! Shared crate-wide constants.

/// Minimum pointer travel, in pixels on either axis, before a drag session
/// recomputes its snap target.
///
/// Units: viewport pixels.
pub const DRAG_MOVE_THRESHOLD_PX: f64 = 8.0;

/// Extra cells added around a widget's larger span dimension when sizing the
/// snap search window.
///
/// The window radius is `max(span.x, span.y) + SNAP_RADIUS_PADDING`.
pub const SNAP_RADIUS_PADDING: u16 = 1;

/// Default frame rate used to pace pointer coalescing and redraws.
pub const DEFAULT_FPS: f64 = 60.0;

/// Terminal rows are roughly twice as tall as columns are wide. The
/// dashboard maps one terminal column to one pixel and one terminal row to
/// this many pixels so grid cells look square.
pub const ROW_PIXEL_SCALE: f64 = 2.0;
