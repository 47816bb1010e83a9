//! Mutable robot state driven by the controller.

use glam::Vec2;
use mower_core::{Direction, RobotState, TilePosition};

use crate::perimeter::PerimeterFollower;

const UNITS_PER_SECOND: u32 = 100;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Battery charge kept in integer units.
///
/// A full battery holds `discharge_seconds * 100` units. Every tile crossing
/// costs one simulated second, so the battery empties after exactly
/// `discharge_seconds` crossings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Battery {
    units: u32,
    capacity: u32,
    per_seconds: u32,
    charge_step: u32,
}

impl Battery {
    /// Creates a full battery lasting `discharge_seconds` crossings.
    #[must_use]
    pub fn new(discharge_seconds: u32, charge_percent_per_tick: u32) -> Self {
        let per_seconds = discharge_seconds.max(1);
        let capacity = per_seconds.saturating_mul(UNITS_PER_SECOND);
        Self {
            units: capacity,
            capacity,
            per_seconds,
            charge_step: charge_percent_per_tick.saturating_mul(per_seconds),
        }
    }

    /// Charge left as a percentage in `0.0..=100.0`.
    #[must_use]
    pub fn percent(&self) -> f32 {
        self.units as f32 / self.per_seconds as f32
    }

    /// Raw charge units.
    #[must_use]
    pub const fn units(&self) -> u32 {
        self.units
    }

    /// Reports whether the battery is drained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.units == 0
    }

    /// Reports whether the battery is at capacity.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.units >= self.capacity
    }

    /// Spends the cost of one tile crossing, returning `true` when this
    /// crossing emptied the battery.
    pub(crate) fn drain_crossing(&mut self) -> bool {
        if self.units == 0 {
            return false;
        }
        self.units = self.units.saturating_sub(UNITS_PER_SECOND);
        self.units == 0
    }

    /// Restores one charging tick worth of units, capped at capacity.
    pub(crate) fn charge_tick(&mut self) {
        self.units = self.units.saturating_add(self.charge_step).min(self.capacity);
    }

    pub(crate) fn refill(&mut self) {
        self.units = self.capacity;
    }
}

/// Continuous and discrete state of the mowing robot.
#[derive(Clone, Debug)]
pub struct Robot {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) tile: TilePosition,
    pub(crate) previous_tile: TilePosition,
    pub(crate) battery: Battery,
    pub(crate) elapsed_seconds: u64,
    pub(crate) recharge_count: u32,
    pub(crate) state: RobotState,
    pub(crate) saved_position: Option<TilePosition>,
    pub(crate) path: Vec<TilePosition>,
    pub(crate) path_index: usize,
    pub(crate) zigzag: Direction,
    pub(crate) follower: PerimeterFollower,
}

impl Robot {
    /// Creates a stopped robot at the provided pixel position.
    #[must_use]
    pub fn new(position: Vec2, tile: TilePosition, battery: Battery) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            tile,
            previous_tile: tile,
            battery,
            elapsed_seconds: 0,
            recharge_count: 0,
            state: RobotState::Stop,
            saved_position: None,
            path: Vec::new(),
            path_index: 0,
            zigzag: Direction::Right,
            follower: PerimeterFollower::default(),
        }
    }

    /// Center of the robot in pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Tile containing the robot's center.
    #[must_use]
    pub const fn tile(&self) -> TilePosition {
        self.tile
    }

    /// Tile occupied before the most recent advance.
    #[must_use]
    pub const fn previous_tile(&self) -> TilePosition {
        self.previous_tile
    }

    /// Current battery.
    #[must_use]
    pub const fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Simulated time in hours.
    #[must_use]
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_seconds as f64 / SECONDS_PER_HOUR
    }

    /// Completed recharge cycles.
    #[must_use]
    pub const fn recharge_count(&self) -> u32 {
        self.recharge_count
    }

    /// Controller state.
    #[must_use]
    pub const fn state(&self) -> RobotState {
        self.state
    }

    /// Tile to return to after recharging, if a discharge cycle is underway.
    #[must_use]
    pub const fn saved_position(&self) -> Option<TilePosition> {
        self.saved_position
    }

    /// Current sweep direction.
    #[must_use]
    pub const fn zigzag(&self) -> Direction {
        self.zigzag
    }

    /// Remaining hops of the active detour.
    #[must_use]
    pub fn remaining_path(&self) -> &[TilePosition] {
        self.path.get(self.path_index..).unwrap_or(&[])
    }

    pub(crate) fn add_elapsed_seconds(&mut self, seconds: u64) {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(seconds);
    }

    pub(crate) fn clear_path(&mut self) {
        self.path.clear();
        self.path_index = 0;
    }
}
