//! Monotonic frame clock

use std::time::Instant;

/// Source of elapsed time for the animation loop
pub trait Clock {
    /// Reset elapsed time to zero
    fn start(&mut self);

    /// Sample the clock: seconds since the last `start`
    fn tick(&mut self) -> f64;
}

/// Wall-clock time from `Instant`
pub struct SystemClock {
    /// Total elapsed time in seconds at the last tick
    pub total_time: f64,
    /// Time between the last two ticks in seconds
    pub delta_time: f64,
    started: Option<Instant>,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            started: None,
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn start(&mut self) {
        self.started = Some(Instant::now());
        self.total_time = 0.0;
        self.delta_time = 0.0;
    }

    fn tick(&mut self) -> f64 {
        let Some(started) = self.started else {
            return 0.0;
        };
        let total = started.elapsed().as_secs_f64();
        self.delta_time = total - self.total_time;
        self.total_time = total;
        total
    }
}

/// Clock driven by hand, for tests and offline rendering
#[derive(Debug, Default)]
pub struct ManualClock {
    now: f64,
    origin: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute time the next `tick` will observe
    pub fn set(&mut self, now: f64) {
        self.now = now;
    }

    pub fn advance(&mut self, dt: f64) {
        self.now += dt;
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.origin = self.now;
    }

    fn tick(&mut self) -> f64 {
        self.now - self.origin
    }
}
