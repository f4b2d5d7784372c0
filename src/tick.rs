use std::time::Duration;

use crate::round::TRACK_SPAN;

pub const TICK_RATE_MS: u64 = 100;

/// On/off switch for the fixed-period animation loop of a round.
///
/// The driver does not own a thread: the runtime delivers ticks at
/// `interval()` and the round only acts on them while the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDriver {
    interval: Duration,
    running: bool,
}

impl TickDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

/// Moves the sprite one step along the track.
/// Returns the new position and whether it crossed the start line.
pub fn advance(position: u32, step: u32) -> (u32, bool) {
    let next = (position + step) % TRACK_SPAN;
    (next, next < step)
}
