#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lawn mower simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened during the step. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single fixed time slice.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
    },
    /// Starts (or restarts) the zig-zag sweep from the robot's current tile.
    Start,
    /// Overrides the robot heading without changing its state.
    SetHeading {
        /// Heading applied to the robot velocity.
        direction: Direction,
    },
    /// Returns the robot to the configured origin and stops it.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the robot controller entered a new state.
    StateChanged {
        /// State active before the transition.
        from: RobotState,
        /// State active after the transition.
        to: RobotState,
    },
    /// Confirms that a grass tile was cut.
    TileMowed {
        /// Tile that switched to its mowed appearance.
        tile: TilePosition,
    },
    /// Reports that the last mowable tile was cut.
    LawnCompleted,
    /// Reports that the battery drained to zero while crossing a tile.
    BatteryDepleted {
        /// Tile the robot entered when the battery emptied.
        tile: TilePosition,
    },
    /// Records the tile the robot returns to once it has recharged.
    PositionSaved {
        /// Tile captured for resumption.
        tile: TilePosition,
    },
    /// Confirms that a detour around an obstacle was planned.
    DetourPlanned {
        /// Free tile the detour ends on.
        goal: TilePosition,
        /// Number of tile-to-tile hops in the planned path.
        hops: u32,
    },
    /// Reports that no detour could be planned from the provided tile.
    DetourUnavailable {
        /// Tile the robot occupied when planning failed.
        from: TilePosition,
    },
    /// Reports that the perimeter follower committed to a new direction.
    PerimeterDirectionChosen {
        /// Direction the robot now follows along the boundary.
        direction: Direction,
        /// Direction committed before the follower halted, if any.
        previous: Option<Direction>,
    },
    /// Confirms that the robot docked on a charging tile.
    ChargingStarted {
        /// Charging tile the robot snapped onto.
        tile: TilePosition,
    },
    /// Confirms that the battery is full again.
    RechargeCompleted {
        /// Number of completed recharge cycles, including this one.
        count: u32,
    },
    /// Confirms that the robot reached its saved row and resumed sweeping.
    SweepResumed {
        /// Tile the robot resumed from.
        tile: TilePosition,
    },
}

/// Discrete controller states of the mowing robot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RobotState {
    /// Idle, either before the first start or after the sweep finished.
    #[default]
    Stop,
    /// Sweeping horizontally along the current row.
    Moving,
    /// Transitioning down to the next row of the sweep.
    MovingDown,
    /// Following a planned detour path around an obstacle.
    FollowingPath,
    /// Walking along the perimeter in search of a charging tile.
    LookupChargeStation,
    /// Docked on a charging tile.
    Charging,
    /// Returning to the row saved before the battery ran out.
    GoingBack,
}

/// Collision category derived from a tile's codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    /// The tile can be entered freely.
    Clear,
    /// The tile holds an obstacle inside the lawn.
    Obstacle,
    /// The tile belongs to the boundary ring.
    Perimeter,
}

/// Compass headings available to the robot, including diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward decreasing column and row indices.
    UpLeft,
    /// Movement toward decreasing column and increasing row indices.
    DownLeft,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing column and decreasing row indices.
    UpRight,
    /// Movement toward increasing column and row indices.
    DownRight,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// Cardinal directions in the order used by boundary scans and path searches.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// All eight neighbours in the order used by perimeter adjacency checks.
    pub const NEIGHBORHOOD: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::DownLeft,
        Direction::DownRight,
        Direction::UpLeft,
        Direction::UpRight,
    ];

    /// Returns the heading pointing the exact other way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::UpLeft => Self::DownRight,
            Self::DownRight => Self::UpLeft,
            Self::DownLeft => Self::UpRight,
            Self::UpRight => Self::DownLeft,
        }
    }

    /// Column and row deltas of a single grid step in this direction.
    #[must_use]
    pub const fn grid_offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::UpLeft => (-1, -1),
            Self::DownLeft => (-1, 1),
            Self::Right => (1, 0),
            Self::UpRight => (1, -1),
            Self::DownRight => (1, 1),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// Location of a single map tile expressed as column and row coordinates.
///
/// Coordinates are signed so that positions just outside the map can be
/// represented and rejected by validity checks instead of wrapping around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    column: i32,
    row: i32,
}

impl TilePosition {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring tile one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (column_delta, row_delta) = direction.grid_offset();
        Self {
            column: self.column.saturating_add(column_delta),
            row: self.row.saturating_add(row_delta),
        }
    }
}

/// Read-only view of the robot captured after a world step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotSnapshot {
    /// Center of the robot in pixels.
    pub position: Vec2,
    /// Top-left corner of the robot's bounding box, where a sprite is anchored.
    pub screen_anchor: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Tile containing the robot's center.
    pub tile: TilePosition,
    /// Controller state.
    pub state: RobotState,
    /// Battery charge in percent.
    pub battery_percent: f32,
    /// Simulated time in hours.
    pub elapsed_hours: f64,
    /// Completed recharge cycles.
    pub recharge_count: u32,
}

/// Mowing progress counters maintained by the grid map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MowingProgress {
    /// Mowable tiles that still carry uncut grass.
    pub remaining: u32,
    /// Tiles cut since the map was loaded.
    pub mowed: u32,
}

impl MowingProgress {
    /// Reports whether every mowable tile has been cut.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, MowingProgress, TilePosition};

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::NEIGHBORHOOD {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn opposite_offsets_cancel_out() {
        let origin = TilePosition::new(3, 3);
        for direction in Direction::NEIGHBORHOOD {
            assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }
    }

    #[test]
    fn step_can_leave_the_positive_quadrant() {
        let corner = TilePosition::new(0, 0);
        assert_eq!(corner.step(Direction::UpLeft), TilePosition::new(-1, -1));
        assert_eq!(corner.step(Direction::Down), TilePosition::new(0, 1));
    }

    #[test]
    fn cardinal_scan_order_is_up_down_left_right() {
        assert_eq!(
            Direction::CARDINAL,
            [
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ]
        );
    }

    #[test]
    fn progress_completes_when_nothing_remains() {
        let mut progress = MowingProgress {
            remaining: 1,
            mowed: 4,
        };
        assert!(!progress.is_complete());
        progress.remaining = 0;
        assert!(progress.is_complete());
    }
}
