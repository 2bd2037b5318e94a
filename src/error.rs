use thiserror::Error;

use crate::grid::{Position, Span};

/// Errors raised while constructing or checking grid geometry.
///
/// Interactive sessions never surface these: they recover locally by
/// falling back to the last valid cell or span.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u16, cols: u16 },
    #[error("cell size must be positive and finite (got {0})")]
    InvalidCellSize(f64),
    #[error("gap must be non-negative and finite (got {0})")]
    InvalidGap(f64),
    #[error("span must be at least 1x1 (got {x}x{y})")]
    EmptySpan { x: u16, y: u16 },
    #[error("widget {id} at {pos:?} with span {span:?} exceeds the grid")]
    OutOfBounds { id: String, pos: Position, span: Span },
    #[error("widgets {first} and {second} overlap")]
    Overlap { first: String, second: String },
}
