//! Velocity integration and tile collision probes.

use glam::Vec2;
use mower_core::{CollisionKind, Direction, TilePosition};
use rand::Rng;

use crate::{config::SimulationConfig, grid::GridMap, robot::Robot};

const REVERT_FACTOR: f32 = 1.5;
const BOUNCE_BASE_DEGREES: f32 = 120.0;
const BOUNCE_JITTER_DEGREES: i32 = 15;
const BOUNCE_LOOK_AHEAD_TICKS: u32 = 10;
const SECONDS_PER_CROSSING: u64 = 1;

/// Bounding-box probes in the order they are checked.
const PROBES: [Probe; 5] = [
    Probe::UpLeft,
    Probe::UpRight,
    Probe::DownRight,
    Probe::DownLeft,
    Probe::Center,
];

#[derive(Clone, Copy, Debug)]
enum Probe {
    UpLeft,
    UpRight,
    DownRight,
    DownLeft,
    Center,
}

impl Probe {
    fn offset(self, half_size: f32) -> Vec2 {
        match self {
            Self::UpLeft => Vec2::new(-half_size, -half_size),
            Self::UpRight => Vec2::new(half_size, -half_size),
            Self::DownRight => Vec2::new(half_size, half_size),
            Self::DownLeft => Vec2::new(-half_size, half_size),
            Self::Center => Vec2::ZERO,
        }
    }
}

/// Geometry and speed of the robot together with its heading table.
#[derive(Clone, Debug, PartialEq)]
pub struct Kinematics {
    tile_size: f32,
    half_size: f32,
    speed: f32,
    headings: [Vec2; 8],
}

impl Kinematics {
    /// Creates the model from raw parameters.
    #[must_use]
    pub fn new(tile_size: f32, half_size: f32, speed: f32) -> Self {
        let headings = [
            Direction::Left,
            Direction::UpLeft,
            Direction::DownLeft,
            Direction::Right,
            Direction::UpRight,
            Direction::DownRight,
            Direction::Up,
            Direction::Down,
        ]
        .map(|direction| {
            let (column, row) = direction.grid_offset();
            Vec2::new(column as f32, row as f32) * speed
        });

        Self {
            tile_size,
            half_size,
            speed,
            headings,
        }
    }

    /// Creates the model described by a configuration.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.tile_size, config.robot_half_size, config.speed)
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Half of the robot's bounding-box side.
    #[must_use]
    pub const fn half_size(&self) -> f32 {
        self.half_size
    }

    /// Travel speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Velocity that moves the robot along `direction` at full speed.
    ///
    /// Diagonal headings move at full speed on both axes.
    #[must_use]
    pub fn heading(&self, direction: Direction) -> Vec2 {
        let slot = match direction {
            Direction::Left => 0,
            Direction::UpLeft => 1,
            Direction::DownLeft => 2,
            Direction::Right => 3,
            Direction::UpRight => 4,
            Direction::DownRight => 5,
            Direction::Up => 6,
            Direction::Down => 7,
        };
        self.headings[slot]
    }

    /// Tile containing the pixel.
    #[must_use]
    pub fn tile_of(&self, point: Vec2) -> TilePosition {
        let tile = (point / self.tile_size).floor();
        TilePosition::new(tile.x as i32, tile.y as i32)
    }

    /// Pixel center of the tile.
    #[must_use]
    pub fn tile_center(&self, tile: TilePosition) -> Vec2 {
        (Vec2::new(tile.column() as f32, tile.row() as f32) + Vec2::splat(0.5)) * self.tile_size
    }

    /// Integrates the velocity over `dt` seconds.
    ///
    /// Returns `true` when the robot entered a new tile. Each crossing costs
    /// one simulated second of elapsed time and battery.
    pub fn advance(&self, robot: &mut Robot, dt: f32) -> bool {
        robot.position += robot.velocity * dt;
        robot.previous_tile = robot.tile;
        robot.tile = self.tile_of(robot.position);

        if robot.tile == robot.previous_tile {
            return false;
        }

        robot.add_elapsed_seconds(SECONDS_PER_CROSSING);
        let _ = robot.battery.drain_crossing();
        true
    }

    /// Steps the robot back by one and a half ticks of travel.
    pub fn revert(&self, robot: &mut Robot, dt: f32) {
        robot.position -= robot.velocity * dt * REVERT_FACTOR;
        robot.tile = self.tile_of(robot.position);
    }

    /// Moves the robot onto the center of the tile it occupies.
    pub fn snap_to_tile_center(&self, robot: &mut Robot) {
        robot.position = self.tile_center(robot.tile);
    }

    /// Classifies what the robot's bounding box touches.
    ///
    /// Corners are probed up-left, up-right, down-right, down-left, then the
    /// center; the first non-clear probe decides. Probes off the grid are
    /// skipped.
    #[must_use]
    pub fn check_collision(&self, robot: &Robot, grid: &GridMap) -> CollisionKind {
        PROBES
            .iter()
            .filter_map(|probe| {
                let point = robot.position + probe.offset(self.half_size);
                grid.collision_at(self.tile_of(point))
            })
            .find(|kind| *kind != CollisionKind::Clear)
            .unwrap_or(CollisionKind::Clear)
    }

    /// Projects the robot's center `ticks` steps ahead along `velocity`.
    ///
    /// Reports `true` when any projected tile is blocked or off the grid.
    #[must_use]
    pub fn look_ahead_collision(
        &self,
        robot: &Robot,
        grid: &GridMap,
        ticks: u32,
        velocity: Vec2,
        dt: f32,
    ) -> bool {
        (1..=ticks).any(|step| {
            let future = robot.position + velocity * dt * step as f32;
            grid.collision_at(self.tile_of(future)) != Some(CollisionKind::Clear)
        })
    }

    /// Turns the robot roughly away from whatever it hit.
    ///
    /// Two candidate headings lie 120 degrees (plus or minus up to 15) to
    /// either side of the current one. One is picked at random; if a ten tick
    /// look-ahead with it collides, the other is used instead.
    pub fn bounce<R>(&self, robot: &mut Robot, grid: &GridMap, dt: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let pick_first = rng.gen_bool(0.5);
        let current = robot.velocity.y.atan2(robot.velocity.x).to_degrees();
        let first_jitter = rng.gen_range(-BOUNCE_JITTER_DEGREES..=BOUNCE_JITTER_DEGREES) as f32;
        let second_jitter = rng.gen_range(-BOUNCE_JITTER_DEGREES..=BOUNCE_JITTER_DEGREES) as f32;
        let first = current + BOUNCE_BASE_DEGREES + first_jitter;
        let second = current - (BOUNCE_BASE_DEGREES + second_jitter);

        let (preferred, fallback) = if pick_first {
            (first, second)
        } else {
            (second, first)
        };

        let candidate = self.velocity_at(preferred);
        robot.velocity =
            if self.look_ahead_collision(robot, grid, BOUNCE_LOOK_AHEAD_TICKS, candidate, dt) {
                self.velocity_at(fallback)
            } else {
                candidate
            };
    }

    fn velocity_at(&self, degrees: f32) -> Vec2 {
        Vec2::from_angle(degrees.to_radians()) * self.speed
    }
}
