#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the lawn mower simulation.
//!
//! The world owns the tile grid, the robot and its random source. Every
//! mutation arrives as a [`Command`] through [`apply`], which reports what
//! happened as [`Event`] values. Read access goes through [`query`].

mod config;
mod controller;
mod error;
mod grid;
mod loader;
mod motion;
mod navigation;
mod perimeter;
mod robot;
mod tiles;

use mower_core::{Command, Event};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::SimulationConfig;
pub use error::{ConfigError, MapError};
pub use grid::GridMap;
pub use loader::{load_map, parse_map};
pub use motion::Kinematics;
pub use navigation::{detour_target, find_path, first_clear_in_row, PathOutcome};
pub use perimeter::{valid_directions, PerimeterFollower, PerimeterStep};
pub use robot::{Battery, Robot};
pub use tiles::{Tile, TileClass, TilePalette, NO_FOREGROUND};

use controller::Controller;

/// Represents the authoritative lawn mower world state.
#[derive(Debug)]
pub struct World {
    grid: GridMap,
    robot: Robot,
    kinematics: Kinematics,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world with a stopped robot parked at the configured origin.
    pub fn new(grid: GridMap, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let kinematics = Kinematics::from_config(&config);
        let origin = config.origin();
        let battery = Battery::new(config.discharge_seconds, config.charge_percent_per_tick);
        let robot = Robot::new(origin, kinematics.tile_of(origin), battery);
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        Ok(Self {
            grid,
            robot,
            kinematics,
            config,
            rng,
            tick_index: 0,
        })
    }

    fn controller(&mut self) -> Controller<'_, ChaCha8Rng> {
        Controller {
            robot: &mut self.robot,
            grid: &mut self.grid,
            kinematics: &self.kinematics,
            rng: &mut self.rng,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.controller().tick(dt.as_secs_f32(), out_events);
        }
        Command::Start => world.controller().start(out_events),
        Command::SetHeading { direction } => world.controller().set_heading(direction),
        Command::Reset => {
            let origin = world.config.origin();
            world.controller().reset(origin, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use mower_core::{MowingProgress, RobotSnapshot};

    use super::{GridMap, Kinematics, Robot, SimulationConfig, World};

    /// Captures the robot's externally visible state.
    #[must_use]
    pub fn robot(world: &World) -> RobotSnapshot {
        let robot = &world.robot;
        RobotSnapshot {
            position: robot.position(),
            screen_anchor: robot.position() - Vec2::splat(world.kinematics.half_size()),
            velocity: robot.velocity(),
            tile: robot.tile(),
            state: robot.state(),
            battery_percent: robot.battery().percent(),
            elapsed_hours: robot.elapsed_hours(),
            recharge_count: robot.recharge_count(),
        }
    }

    /// Provides read-only access to the full robot model.
    #[must_use]
    pub fn robot_model(world: &World) -> &Robot {
        &world.robot
    }

    /// Reports the mowing counters.
    #[must_use]
    pub fn progress(world: &World) -> MowingProgress {
        world.grid.progress()
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Provides read-only access to the configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Provides read-only access to the motion model.
    #[must_use]
    pub fn kinematics(world: &World) -> &Kinematics {
        &world.kinematics
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use mower_core::{Direction, RobotState, TilePosition};

    use super::*;
    use crate::grid::test_support::grid_from_rows;

    const DT: Duration = Duration::from_millis(10);

    fn world(rows: &[&str]) -> World {
        World::new(grid_from_rows(rows), SimulationConfig::default()).expect("valid world")
    }

    fn square() -> World {
        world(&["#####", "#...#", "#...#", "#...#", "#####"])
    }

    #[test]
    fn new_world_parks_robot_at_origin() {
        let world = square();
        let snapshot = query::robot(&world);
        assert_eq!(snapshot.position, Vec2::new(25.0, 25.0));
        assert_eq!(snapshot.screen_anchor, Vec2::new(20.0, 20.0));
        assert_eq!(snapshot.tile, TilePosition::new(1, 1));
        assert_eq!(snapshot.state, RobotState::Stop);
        assert_eq!(snapshot.battery_percent, 100.0);
        assert_eq!(query::progress(&world).remaining, 9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulationConfig {
            speed: 0.0,
            ..SimulationConfig::default()
        };
        let result = World::new(grid_from_rows(&["..", ".."]), config);
        assert!(matches!(result, Err(ConfigError::Speed(_))));
    }

    #[test]
    fn tick_reports_time_and_mows_the_starting_tile() {
        let mut world = square();
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { dt: DT }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { dt: DT },
                Event::TileMowed {
                    tile: TilePosition::new(1, 1)
                },
            ]
        );
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(query::robot(&world).position, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn start_moves_right_with_a_full_battery() {
        let mut world = square();
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);

        assert_eq!(
            events,
            vec![Event::StateChanged {
                from: RobotState::Stop,
                to: RobotState::Moving
            }]
        );
        let snapshot = query::robot(&world);
        assert_eq!(snapshot.velocity, Vec2::new(500.0, 0.0));
        assert_eq!(query::robot_model(&world).zigzag(), Direction::Right);
    }

    #[test]
    fn set_heading_keeps_the_state() {
        let mut world = square();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetHeading {
                direction: Direction::Down,
            },
            &mut events,
        );

        assert!(events.is_empty());
        let snapshot = query::robot(&world);
        assert_eq!(snapshot.velocity, Vec2::new(0.0, 500.0));
        assert_eq!(snapshot.state, RobotState::Stop);
    }

    #[test]
    fn reset_returns_to_origin_and_stops() {
        let mut world = square();
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        for _ in 0..5 {
            apply(&mut world, Command::Tick { dt: DT }, &mut events);
        }
        assert_ne!(query::robot(&world).position, Vec2::new(25.0, 25.0));

        events.clear();
        apply(&mut world, Command::Reset, &mut events);

        assert_eq!(
            events,
            vec![Event::StateChanged {
                from: RobotState::Moving,
                to: RobotState::Stop
            }]
        );
        let snapshot = query::robot(&world);
        assert_eq!(snapshot.position, Vec2::new(25.0, 25.0));
        assert_eq!(snapshot.velocity, Vec2::ZERO);
        assert_eq!(query::robot_model(&world).saved_position(), None);
        assert!(query::robot_model(&world).remaining_path().is_empty());
    }
}
