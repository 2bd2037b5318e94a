//! Grid placement and interactive layout for dashboard widgets.
//!
//! The engine half ([`grid`], [`layout`], [`session`], [`engine`]) is pure
//! computation over a fixed grid: first-fit placement, drag with best-overlap
//! snapping, and resize to catalog or free-form spans. The host half
//! ([`dashboard`], [`drivers`], [`event_loop`]) is a terminal dashboard that
//! feeds it real pointer input.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod grid;
pub mod keybindings;
pub mod layout;
pub mod session;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use catalog::{SpanCatalog, WidgetKind};
pub use engine::{EngineConfig, LayoutEngine};
pub use error::LayoutError;
pub use grid::{GridConfig, PixelPoint, PixelRect, Position, Span, WidgetPlacement};
pub use layout::{OccupancyIndex, Placements, find_first_fit, is_valid};
pub use session::{Effect, PointerButton, PressOrigin, SessionState};
