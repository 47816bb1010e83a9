//! Tunable parameters of a simulation run.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, tiles::TilePalette};

const DEFAULT_TILE_SIZE: f32 = 16.0;
const DEFAULT_ROBOT_HALF_SIZE: f32 = 5.0;
const DEFAULT_SPEED: f32 = 500.0;
const DEFAULT_TIME_SLICE_MS: u64 = 10;
const DEFAULT_MAX_FRAME_MS: u64 = 150;
const DEFAULT_DISCHARGE_SECONDS: u32 = 2 * 3600;
const DEFAULT_CHARGE_PERCENT_PER_TICK: u32 = 1;
const DEFAULT_ORIGIN: [f32; 2] = [25.0, 25.0];
const DEFAULT_RNG_SEED: u64 = 0x6d6f_7765_725f_7331;

/// Complete set of knobs describing the robot, its battery and the clock.
///
/// Every field falls back to its stock value when omitted from a
/// configuration file, so an empty document is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of a square tile in pixels.
    pub tile_size: f32,
    /// Half of the robot's bounding-box side in pixels.
    pub robot_half_size: f32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Fixed simulation step in milliseconds.
    pub time_slice_ms: u64,
    /// Longest real frame the clock replays, in milliseconds.
    pub max_frame_ms: u64,
    /// Simulated seconds a full battery lasts, one second per tile crossing.
    pub discharge_seconds: u32,
    /// Battery percentage restored per tick while charging.
    pub charge_percent_per_tick: u32,
    /// Pixel position the robot returns to on reset.
    pub origin: [f32; 2],
    /// Seed of the random source used for bounces.
    pub rng_seed: u64,
    /// Tile codes of the map's tile sheet.
    pub palette: TilePalette,
}

impl SimulationConfig {
    /// Checks that every parameter describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::TileSize(self.tile_size));
        }

        if !(self.robot_half_size.is_finite()
            && self.robot_half_size > 0.0
            && self.robot_half_size < self.tile_size / 2.0)
        {
            return Err(ConfigError::RobotSize {
                half_size: self.robot_half_size,
                tile_size: self.tile_size,
            });
        }

        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::Speed(self.speed));
        }

        let step = self.step_length();
        if step >= self.tile_size {
            return Err(ConfigError::StepLength {
                step,
                tile_size: self.tile_size,
            });
        }

        if self.discharge_seconds == 0 {
            return Err(ConfigError::DischargeDuration);
        }

        if !(1..=100).contains(&self.charge_percent_per_tick) {
            return Err(ConfigError::ChargeRate(self.charge_percent_per_tick));
        }

        Ok(())
    }

    /// Fixed simulation step.
    #[must_use]
    pub fn time_slice(&self) -> Duration {
        Duration::from_millis(self.time_slice_ms.max(1))
    }

    /// Distance covered in one tick, in pixels.
    #[must_use]
    pub fn step_length(&self) -> f32 {
        self.speed * self.time_slice().as_secs_f32()
    }

    /// Upper bound applied to a single real frame.
    #[must_use]
    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms)
    }

    /// Reset position as a vector.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::from(self.origin)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            robot_half_size: DEFAULT_ROBOT_HALF_SIZE,
            speed: DEFAULT_SPEED,
            time_slice_ms: DEFAULT_TIME_SLICE_MS,
            max_frame_ms: DEFAULT_MAX_FRAME_MS,
            discharge_seconds: DEFAULT_DISCHARGE_SECONDS,
            charge_percent_per_tick: DEFAULT_CHARGE_PERCENT_PER_TICK,
            origin: DEFAULT_ORIGIN,
            rng_seed: DEFAULT_RNG_SEED,
            palette: TilePalette::default(),
        }
    }
}
