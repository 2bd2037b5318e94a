use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Frame-paced event loop for the dashboard.
///
/// Each iteration runs one frame (process the newest pointer move, then
/// draw) and afterwards drains every terminal event that arrives before the
/// next frame is due. Bursts of mouse motion therefore cost one layout
/// step per frame, not one per event.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Runs the dashboard loop, taking control of the current thread.
    ///
    /// The `handler` is called with:
    /// - `None` once per frame interval, to process the newest pointer move and
    ///   draw.
    /// - `Some(event)` for every input event, in arrival order, between frames.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }

            let deadline = Instant::now() + self.frame_interval;
            while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                if !self.driver.poll(remaining)? {
                    break;
                }
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
