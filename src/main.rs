use std::io;

use clap::Parser;
use ratatui::layout::Rect;

use widget_grid::config::{Cli, DashboardConfig};
use widget_grid::dashboard::Dashboard;
use widget_grid::drivers::OutputDriver;
use widget_grid::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use widget_grid::event_loop::{ControlFlow, EventLoop};
use widget_grid::tracing_sub;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::try_from(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    tracing_sub::init(config.log_file.as_deref())?;
    tracing::info!(
        rows = config.grid.rows(),
        cols = config.grid.cols(),
        "starting dashboard"
    );

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;

    let mut dashboard = Dashboard::new(&config);
    let size = output.size()?;
    dashboard.set_viewport(Rect::new(0, 0, size.width, size.height));

    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), config.frame_interval);
    let result = event_loop.run(|_, event| match event {
        Some(event) => Ok(dashboard.handle_event(&event)),
        None => {
            dashboard.tick();
            output.draw(|mut ui| dashboard.render(&mut ui))?;
            Ok(ControlFlow::Continue)
        }
    });

    output.exit()?;
    result
}
