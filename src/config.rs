use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::constants::{DEFAULT_FPS, DRAG_MOVE_THRESHOLD_PX, SNAP_RADIUS_PADDING};
use crate::engine::EngineConfig;
use crate::grid::GridConfig;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "widget-grid",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal dashboard for arranging widgets on a fixed grid"
)]
pub struct Cli {
    /// Number of grid rows.
    #[arg(long, default_value_t = 4)]
    pub rows: u16,

    /// Number of grid columns.
    #[arg(long, default_value_t = 6)]
    pub cols: u16,

    /// Cell edge length in layout pixels. One terminal column is one pixel,
    /// one terminal row is two.
    #[arg(long = "cell-size", value_name = "PX", default_value_t = 12.0)]
    pub cell_size: f64,

    /// Gap between adjacent cells in layout pixels.
    #[arg(long, value_name = "PX", default_value_t = 2.0)]
    pub gap: f64,

    /// Frame rate for pointer processing and redraws.
    #[arg(short = 'f', long, value_name = "FPS", default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Start with dragging disabled.
    #[arg(long)]
    pub no_drag: bool,

    /// Start with resizing disabled.
    #[arg(long)]
    pub no_resize: bool,

    /// Pointer travel (px) required before the drag target is recomputed.
    #[arg(long, value_name = "PX", default_value_t = DRAG_MOVE_THRESHOLD_PX)]
    pub move_threshold: f64,

    /// Extra cells searched around the pointer when snapping a drag.
    #[arg(long, value_name = "CELLS", default_value_t = SNAP_RADIUS_PADDING)]
    pub snap_padding: u16,

    /// Write debug logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rows must be between 1 and {max} (got {got})")]
    Rows { got: u16, max: u16 },
    #[error("cols must be between 1 and {max} (got {got})")]
    Cols { got: u16, max: u16 },
    #[error("cell size must be between 2 and 200 px (got {0})")]
    CellSize(f64),
    #[error("gap must be between 0 and 50 px (got {0})")]
    Gap(f64),
    #[error("fps must be between 1 and 240 (got {0})")]
    Fps(f64),
    #[error("move threshold must be a finite, non-negative number (got {0})")]
    MoveThreshold(f64),
}

/// Grid dimensions are bounded so a full grid still fits a large terminal.
pub const MAX_ROWS: u16 = 64;
pub const MAX_COLS: u16 = 64;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub grid: GridConfig,
    pub frame_interval: Duration,
    pub drag_enabled: bool,
    pub resize_enabled: bool,
    pub engine: EngineConfig,
    pub log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for DashboardConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=MAX_ROWS).contains(&cli.rows) {
            return Err(ConfigError::Rows {
                got: cli.rows,
                max: MAX_ROWS,
            });
        }
        if !(1..=MAX_COLS).contains(&cli.cols) {
            return Err(ConfigError::Cols {
                got: cli.cols,
                max: MAX_COLS,
            });
        }
        if !(2.0..=200.0).contains(&cli.cell_size) {
            return Err(ConfigError::CellSize(cli.cell_size));
        }
        if !(0.0..=50.0).contains(&cli.gap) {
            return Err(ConfigError::Gap(cli.gap));
        }
        if !(1.0..=240.0).contains(&cli.fps) {
            return Err(ConfigError::Fps(cli.fps));
        }
        if !cli.move_threshold.is_finite() || cli.move_threshold < 0.0 {
            return Err(ConfigError::MoveThreshold(cli.move_threshold));
        }
        let grid = GridConfig::new(cli.rows, cli.cols, cli.cell_size, cli.gap)
            .map_err(|_| ConfigError::CellSize(cli.cell_size))?;
        Ok(Self {
            grid,
            frame_interval: cli.frame_interval(),
            drag_enabled: !cli.no_drag,
            resize_enabled: !cli.no_resize,
            engine: EngineConfig {
                move_threshold: cli.move_threshold,
                snap_radius_padding: cli.snap_padding,
            },
            log_file: cli.log_file.clone(),
        })
    }
}
