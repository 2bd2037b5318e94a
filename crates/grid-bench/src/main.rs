use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use widget_grid::{
    Effect, GridConfig, LayoutEngine, PixelPoint, Placements, PointerButton, Position, PressOrigin,
    Span, SpanCatalog, WidgetPlacement,
};

const CELL_SIZE: f64 = 120.0;
const GAP: f64 = 10.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Drag,
    Resize,
    Mixed,
}

#[derive(Parser, Debug)]
#[command(
    name = "grid-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Measures drag and resize update cost against a frame budget"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 5.0
    )]
    duration_seconds: f64,

    /// Target frames per second. Each pointer update must fit one frame.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 60.0)]
    target_fps: f64,

    /// Grid rows.
    #[arg(long, default_value_t = 8)]
    rows: u16,

    /// Grid columns.
    #[arg(long, default_value_t = 12)]
    cols: u16,

    /// Share of cells occupied by 1x1 widgets before the run starts.
    #[arg(long, value_name = "RATIO", default_value_t = 0.5)]
    fill: f64,

    /// Which sessions to exercise.
    #[arg(long, value_enum, default_value_t = Mode::Mixed)]
    mode: Mode,

    /// Pointer updates per session before release.
    #[arg(long, value_name = "FRAMES", default_value_t = 120)]
    session_frames: u32,
}

impl BenchCli {
    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds)
    }

    fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps)
    }
}

struct BenchConfig {
    duration: Duration,
    target_fps: f64,
    frame_budget: Duration,
    grid: GridConfig,
    fill: f64,
    mode: Mode,
    session_frames: u32,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if !(1.0..=240.0).contains(&cli.target_fps) {
            return Err("fps must be between 1 and 240".to_string());
        }
        if !(0.0..=0.95).contains(&cli.fill) {
            return Err("fill must be between 0 and 0.95".to_string());
        }
        if cli.session_frames == 0 {
            return Err("session frames must be at least 1".to_string());
        }
        let grid = GridConfig::new(cli.rows, cli.cols, CELL_SIZE, GAP).map_err(|e| e.to_string())?;
        Ok(Self {
            duration: cli.duration(),
            target_fps: cli.target_fps,
            frame_budget: cli.frame_budget(),
            grid,
            fill: cli.fill,
            mode: cli.mode,
            session_frames: cli.session_frames,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn seed_placements(config: &BenchConfig, rng: &mut Lcg) -> Placements<u32> {
    let mut placements = Placements::new();
    let mut id = 0u32;
    for row in 1..=config.grid.rows() {
        for col in 1..=config.grid.cols() {
            if rng.next_f64() < config.fill {
                placements.insert(WidgetPlacement::new(
                    id,
                    Position::new(row, col),
                    Span::new(1, 1),
                ));
                id += 1;
            }
        }
    }
    if placements.is_empty() {
        placements.insert(WidgetPlacement::new(0, Position::new(1, 1), Span::new(1, 1)));
    }
    placements
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let mut rng = Lcg::seeded_from_clock();
    let mut placements = seed_placements(config, &mut rng);
    let mut engine: LayoutEngine<u32> = LayoutEngine::default();
    let mut stats = BenchStats::new(placements.len());
    let grid = &config.grid;
    let amplitude = grid.bounds().width.min(grid.bounds().height) / 2.0;

    while stats.elapsed() < config.duration {
        let ids = placements.ids();
        let id = ids[(rng.next() as usize) % ids.len()];
        let Some(widget) = placements.get(id) else {
            continue;
        };
        let rect = grid.placement_rect(widget.pos, widget.span);
        let resize = match config.mode {
            Mode::Drag => false,
            Mode::Resize => true,
            Mode::Mixed => rng.next() & 1 == 1,
        };
        let start = if resize {
            PixelPoint::new(rect.right() - 1.0, rect.bottom() - 1.0)
        } else {
            rect.center()
        };
        let snapshot = placements.to_vec();
        if resize {
            engine.begin_resize(
                id,
                start,
                PointerButton::Left,
                SpanCatalog::Unrestricted,
                &snapshot,
            );
        } else {
            engine.begin_drag(
                id,
                start,
                PointerButton::Left,
                PressOrigin::Widget,
                grid,
                &snapshot,
            );
        }

        for frame in 0..config.session_frames {
            let t = f64::from(frame) * 0.1;
            let pointer = PixelPoint::new(
                start.x + amplitude * t.sin(),
                start.y + amplitude * (t * 0.7).cos() - amplitude,
            );
            let began = Instant::now();
            engine.pointer_moved(pointer);
            let effects = engine.frame(grid);
            stats.record_update(began.elapsed(), effects.len());
        }

        let began = Instant::now();
        let effects = engine.pointer_up(grid, &placements.to_vec());
        stats.record_update(began.elapsed(), effects.len());
        for effect in &effects {
            if placements.apply(effect) {
                stats.commits += 1;
            }
            if matches!(effect, Effect::Reverted { .. }) {
                stats.reverts += 1;
            }
        }
        stats.sessions += 1;
    }

    stats.invariants = placements.check_invariants(grid).map_err(|e| e.to_string());
    stats.mark_completed();
    stats
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    widgets: usize,
    sessions: u64,
    updates: u64,
    effects: u64,
    commits: u64,
    reverts: u64,
    total_update_time: Duration,
    fastest_update: Duration,
    slowest_update: Duration,
    invariants: Result<(), String>,
}

impl BenchStats {
    fn new(widgets: usize) -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            widgets,
            sessions: 0,
            updates: 0,
            effects: 0,
            commits: 0,
            reverts: 0,
            total_update_time: Duration::ZERO,
            fastest_update: Duration::MAX,
            slowest_update: Duration::ZERO,
            invariants: Ok(()),
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_update(&mut self, took: Duration, effects: usize) {
        self.updates = self.updates.saturating_add(1);
        self.effects = self.effects.saturating_add(effects as u64);
        self.total_update_time += took;
        if took < self.fastest_update {
            self.fastest_update = took;
        }
        if took > self.slowest_update {
            self.slowest_update = took;
        }
    }

    fn average_update_us(&self) -> f64 {
        if self.updates == 0 {
            return 0.0;
        }
        (self.total_update_time.as_secs_f64() / self.updates as f64) * 1_000_000.0
    }

    fn fastest_update_us(&self) -> f64 {
        if self.updates == 0 {
            return 0.0;
        }
        self.fastest_update.as_secs_f64() * 1_000_000.0
    }

    fn slowest_update_us(&self) -> f64 {
        self.slowest_update.as_secs_f64() * 1_000_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let budget_us = config.frame_budget.as_secs_f64() * 1_000_000.0;
        let worst_share = if budget_us > 0.0 {
            self.slowest_update_us() / budget_us * 100.0
        } else {
            0.0
        };
        let invariants = match &self.invariants {
            Ok(()) => "ok".to_string(),
            Err(err) => format!("VIOLATED: {err}"),
        };

        indoc::formatdoc!(
            r#"
            Grid bench completed ({mode:?}).
            Grid: {rows}x{cols} with {widgets} widgets | Duration: {elapsed:.2}s
            Sessions: {sessions} | Updates: {updates} | Effects: {effects}
            Commits: {commits} | Reverts: {reverts}
            Update: avg {avg:.2} us | best {best:.2} us | worst {worst:.2} us
            Frame budget at {fps:.0} fps: {budget:.0} us (worst update uses {share:.2}%)
            Placement invariants: {invariants}
            "#,
            mode = config.mode,
            rows = config.grid.rows(),
            cols = config.grid.cols(),
            widgets = self.widgets,
            elapsed = self.elapsed().as_secs_f64(),
            sessions = self.sessions,
            updates = self.updates,
            effects = self.effects,
            commits = self.commits,
            reverts = self.reverts,
            avg = self.average_update_us(),
            best = self.fastest_update_us(),
            worst = self.slowest_update_us(),
            fps = config.target_fps,
            budget = budget_us,
            share = worst_share,
            invariants = invariants,
        )
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn seeded_from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
            ^ 0xA5A5_A5A5_1234_5678;
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next()) / f64::from(u32::MAX)
    }
}
