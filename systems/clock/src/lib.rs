#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep frame clock that turns variable frame time into tick commands.

use std::time::Duration;

use mower_core::Command;

const DEFAULT_TIME_SLICE: Duration = Duration::from_millis(10);
const DEFAULT_MAX_FRAME: Duration = Duration::from_millis(150);

/// Configuration parameters required to construct the frame clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    time_slice: Duration,
    max_frame: Duration,
}

impl Config {
    /// Creates a configuration with the provided tick length and frame clamp.
    #[must_use]
    pub const fn new(time_slice: Duration, max_frame: Duration) -> Self {
        Self {
            time_slice,
            max_frame,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SLICE, DEFAULT_MAX_FRAME)
    }
}

/// Accumulates frame time and releases it as whole fixed-length ticks.
///
/// Frames longer than the configured clamp only contribute the clamp, so a
/// stalled host never floods the world with catch-up ticks.
#[derive(Debug)]
pub struct FrameClock {
    time_slice: Duration,
    max_frame: Duration,
    accumulator: Duration,
}

impl FrameClock {
    /// Creates a new frame clock with an empty accumulator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            time_slice: config.time_slice,
            max_frame: config.max_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Length of a single emitted tick.
    #[must_use]
    pub const fn time_slice(&self) -> Duration {
        self.time_slice
    }

    /// Frame time carried over that has not yet filled a whole tick.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Consumes the duration of a rendered frame and emits tick commands.
    pub fn handle(&mut self, frame: Duration, out: &mut Vec<Command>) {
        if self.time_slice.is_zero() {
            return;
        }

        let clamped = frame.min(self.max_frame);
        self.accumulator = self.accumulator.saturating_add(clamped);

        for _ in 0..self.resolve_ticks() {
            out.push(Command::Tick {
                dt: self.time_slice,
            });
        }
    }

    /// Discards any carried-over frame time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    fn resolve_ticks(&mut self) -> usize {
        let mut ticks = 0;
        while self.accumulator >= self.time_slice {
            self.accumulator -= self.time_slice;
            ticks += 1;
        }
        ticks
    }
}
