//! Time management for the client loop.

use std::time::Duration;

/// Frame timing, stepped explicitly with `advance`.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Step the clock by one frame of `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time of the last frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total elapsed time since start; the timestamp fed to pointer handling.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames stepped since start.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Lifetime component for transient entities (traces).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Age by `dt`; true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}
