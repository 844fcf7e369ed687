//! Simulation clock.
//!
//! [`Time`] is advanced by the caller's frame delta at the start of each tick.
//! The simulation never reads the wall clock itself, so a test can drive it
//! with any sequence of deltas and get the same result every run.

use std::time::Duration;

/// Frame timing. Owned by the simulation and advanced each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Delta passed to the most recent tick.
    delta: Duration,
    /// Sum of all deltas so far.
    elapsed: Duration,
    /// Tick counter.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame. Negative or non-finite deltas count as zero.
    pub(crate) fn advance(&mut self, delta_secs: f32) {
        let secs = if delta_secs.is_finite() && delta_secs > 0.0 {
            delta_secs
        } else {
            0.0
        };
        self.delta = Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Duration of the current frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second implied by the current delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
