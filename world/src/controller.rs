//! Zig-zag sweep state machine.

use glam::Vec2;
use mower_core::{CollisionKind, Direction, Event, RobotState, TilePosition};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    grid::GridMap,
    motion::Kinematics,
    navigation::{self, PathOutcome},
    perimeter::PerimeterStep,
    robot::Robot,
};

const PERIMETER_LOOK_AHEAD_TICKS: u32 = 3;
const SECONDS_PER_CHARGE_TICK: u64 = 36;
const RETURN_COLUMN: i32 = 1;

/// Borrowed world state a single controller step operates on.
pub(crate) struct Controller<'a, R: ?Sized> {
    pub(crate) robot: &'a mut Robot,
    pub(crate) grid: &'a mut GridMap,
    pub(crate) kinematics: &'a Kinematics,
    pub(crate) rng: &'a mut R,
}

impl<R> Controller<'_, R>
where
    R: Rng + ?Sized,
{
    /// Runs one fixed step of the state machine and mows the tile underneath.
    pub(crate) fn tick(&mut self, dt: f32, out: &mut Vec<Event>) {
        match self.robot.state {
            RobotState::Stop => {}
            RobotState::Moving => self.sweep(dt, out),
            RobotState::MovingDown => self.descend(dt, out),
            RobotState::FollowingPath => self.follow_path(dt, out),
            RobotState::LookupChargeStation => self.seek_charger(dt, out),
            RobotState::Charging => self.charge(out),
            RobotState::GoingBack => self.return_to_saved_row(dt, out),
        }

        self.mow_current_tile(out);
    }

    /// Begins a fresh sweep from the current position.
    pub(crate) fn start(&mut self, out: &mut Vec<Event>) {
        self.restart_sweep();
        self.robot.saved_position = None;
        self.robot.clear_path();
        transition(self.robot, RobotState::Moving, out);
    }

    /// Overrides the velocity with a manual heading.
    pub(crate) fn set_heading(&mut self, direction: Direction) {
        self.robot.velocity = self.kinematics.heading(direction);
    }

    /// Parks the robot at `origin`.
    pub(crate) fn reset(&mut self, origin: Vec2, out: &mut Vec<Event>) {
        let robot = &mut *self.robot;
        robot.position = origin;
        robot.tile = self.kinematics.tile_of(origin);
        robot.previous_tile = robot.tile;
        robot.velocity = Vec2::ZERO;
        robot.saved_position = None;
        robot.follower.clear();
        robot.clear_path();
        transition(robot, RobotState::Stop, out);
    }

    fn sweep(&mut self, dt: f32, out: &mut Vec<Event>) {
        let _ = self.advance(dt, out);

        let collision = self.kinematics.check_collision(self.robot, self.grid);
        if collision == CollisionKind::Clear {
            return;
        }

        self.kinematics.revert(self.robot, dt);
        let charged = !self.robot.battery.is_empty();
        match (collision, charged) {
            (CollisionKind::Perimeter, true) => self.next_row(out),
            (CollisionKind::Obstacle, true) => self.plan_detour(out),
            (CollisionKind::Obstacle, false) => {
                self.kinematics
                    .bounce(self.robot, self.grid, dt, &mut *self.rng);
                save_position(self.robot, out);
            }
            (CollisionKind::Perimeter, false) => {
                self.robot.velocity = Vec2::ZERO;
                save_position(self.robot, out);
                transition(self.robot, RobotState::LookupChargeStation, out);
            }
            (CollisionKind::Clear, _) => {}
        }
    }

    fn next_row(&mut self, out: &mut Vec<Event>) {
        let here = self.robot.tile;
        let next_row = i64::from(here.row()) + 1;
        if next_row > i64::from(self.grid.height()) - 2 {
            self.finish(out);
            return;
        }

        let below = here.step(Direction::Down);
        if self.grid.is_traversable(below) {
            self.robot.velocity = self.kinematics.heading(Direction::Down);
            transition(self.robot, RobotState::MovingDown, out);
            return;
        }

        let sweep = self.robot.zigzag.opposite();
        let grid = &*self.grid;
        let detour = navigation::first_clear_in_row(grid, below.row(), here.column(), sweep)
            .and_then(|goal| found_path(grid, here, goal));
        match detour {
            Some((goal, path)) => {
                self.robot.zigzag = sweep;
                self.begin_path(goal, path, out);
            }
            None => {
                warn!(column = here.column(), row = here.row(), "next row is unreachable");
                out.push(Event::DetourUnavailable { from: here });
                self.finish(out);
            }
        }
    }

    fn plan_detour(&mut self, out: &mut Vec<Event>) {
        self.robot.velocity = Vec2::ZERO;
        let here = self.robot.tile;
        let grid = &*self.grid;
        let detour = navigation::detour_target(grid, here, self.robot.zigzag)
            .and_then(|goal| found_path(grid, here, goal));

        match detour {
            Some((goal, path)) => self.begin_path(goal, path, out),
            None => {
                warn!(
                    column = here.column(),
                    row = here.row(),
                    "no detour around obstacle, moving to the next row"
                );
                out.push(Event::DetourUnavailable { from: here });
                self.next_row(out);
            }
        }
    }

    fn begin_path(&mut self, goal: TilePosition, path: Vec<TilePosition>, out: &mut Vec<Event>) {
        let hops = u32::try_from(path.len().saturating_sub(1)).unwrap_or(u32::MAX);
        debug!(column = goal.column(), row = goal.row(), hops, "detour planned");
        self.robot.velocity = Vec2::ZERO;
        self.robot.path = path;
        self.robot.path_index = 0;
        out.push(Event::DetourPlanned { goal, hops });
        transition(self.robot, RobotState::FollowingPath, out);
    }

    fn finish(&mut self, out: &mut Vec<Event>) {
        self.robot.velocity = Vec2::ZERO;
        info!(
            remaining = self.grid.tiles_remaining(),
            mowed = self.grid.tiles_mowed(),
            "sweep finished"
        );
        transition(self.robot, RobotState::Stop, out);
    }

    fn descend(&mut self, dt: f32, out: &mut Vec<Event>) {
        if !self.advance(dt, out) {
            return;
        }

        self.kinematics.snap_to_tile_center(self.robot);
        let sweep = self.robot.zigzag.opposite();
        self.robot.zigzag = sweep;
        self.robot.velocity = self.kinematics.heading(sweep);
        transition(self.robot, RobotState::Moving, out);
    }

    fn follow_path(&mut self, dt: f32, out: &mut Vec<Event>) {
        match self.robot.path.get(self.robot.path_index).copied() {
            None => {
                self.kinematics.snap_to_tile_center(self.robot);
                self.robot.clear_path();
                self.robot.velocity = self.kinematics.heading(self.robot.zigzag);
                transition(self.robot, RobotState::Moving, out);
            }
            Some(next) if next == self.robot.tile => {
                self.kinematics.snap_to_tile_center(self.robot);
                self.robot.path_index += 1;
                self.robot.velocity = Vec2::ZERO;
            }
            Some(next) => {
                let delta = Vec2::new(
                    (next.column() - self.robot.tile.column()) as f32,
                    (next.row() - self.robot.tile.row()) as f32,
                );
                self.robot.velocity = delta * self.kinematics.speed();
            }
        }

        let _ = self.advance(dt, out);
    }

    fn seek_charger(&mut self, dt: f32, out: &mut Vec<Event>) {
        if self.grid.is_charging(self.robot.tile) {
            self.robot.velocity = Vec2::ZERO;
            self.kinematics.snap_to_tile_center(self.robot);
            let tile = self.robot.tile;
            info!(column = tile.column(), row = tile.row(), "docked on charging pad");
            out.push(Event::ChargingStarted { tile });
            transition(self.robot, RobotState::Charging, out);
            return;
        }

        let was_stranded = self.robot.follower.is_stranded();
        let mut follower = self.robot.follower;
        let robot = &*self.robot;
        let (grid, kinematics) = (&*self.grid, self.kinematics);
        let step = follower.step(grid, robot.tile, || {
            kinematics.look_ahead_collision(
                robot,
                grid,
                PERIMETER_LOOK_AHEAD_TICKS,
                robot.velocity,
                dt,
            )
        });
        self.robot.follower = follower;

        match step {
            PerimeterStep::Committed {
                direction,
                previous,
            } => {
                debug!(?direction, ?previous, "following perimeter");
                self.robot.velocity = self.kinematics.heading(direction);
                out.push(Event::PerimeterDirectionChosen {
                    direction,
                    previous,
                });
            }
            PerimeterStep::Continue => {}
            PerimeterStep::Halted => {
                self.kinematics.snap_to_tile_center(self.robot);
                self.robot.velocity = Vec2::ZERO;
            }
            PerimeterStep::Stranded => {
                self.robot.velocity = Vec2::ZERO;
                if !was_stranded {
                    let tile = self.robot.tile;
                    warn!(
                        column = tile.column(),
                        row = tile.row(),
                        "perimeter follower has no direction left"
                    );
                }
            }
        }

        let _ = self.advance(dt, out);
    }

    fn charge(&mut self, out: &mut Vec<Event>) {
        if !self.robot.battery.is_full() {
            self.robot.battery.charge_tick();
            self.robot.add_elapsed_seconds(SECONDS_PER_CHARGE_TICK);
            return;
        }

        self.robot.recharge_count = self.robot.recharge_count.saturating_add(1);
        let count = self.robot.recharge_count;
        info!(count, "battery recharged");
        out.push(Event::RechargeCompleted { count });

        self.restart_sweep();
        self.robot.velocity = self.kinematics.heading(Direction::Left);
        transition(self.robot, RobotState::GoingBack, out);
    }

    fn return_to_saved_row(&mut self, dt: f32, out: &mut Vec<Event>) {
        let _ = self.advance(dt, out);

        let here = self.robot.tile;
        let Some(saved) = self.robot.saved_position else {
            self.resume(out);
            return;
        };

        if here.column() == RETURN_COLUMN {
            let vertical = if saved.row() < here.row() {
                Direction::Up
            } else {
                Direction::Down
            };
            self.robot.velocity = self.kinematics.heading(vertical);
        }

        if here.row() == saved.row() {
            self.resume(out);
        }
    }

    fn resume(&mut self, out: &mut Vec<Event>) {
        self.kinematics.snap_to_tile_center(self.robot);
        self.robot.saved_position = None;
        self.restart_sweep();
        let tile = self.robot.tile;
        debug!(column = tile.column(), row = tile.row(), "sweep resumed");
        out.push(Event::SweepResumed { tile });
        transition(self.robot, RobotState::Moving, out);
    }

    fn restart_sweep(&mut self) {
        self.robot.velocity = self.kinematics.heading(Direction::Right);
        self.robot.battery.refill();
        self.robot.follower.clear();
        self.robot.zigzag = Direction::Right;
    }

    fn advance(&mut self, dt: f32, out: &mut Vec<Event>) -> bool {
        let was_empty = self.robot.battery.is_empty();
        let crossed = self.kinematics.advance(self.robot, dt);
        if !was_empty && self.robot.battery.is_empty() {
            let tile = self.robot.tile;
            info!(column = tile.column(), row = tile.row(), "battery depleted");
            out.push(Event::BatteryDepleted { tile });
        }
        crossed
    }

    fn mow_current_tile(&mut self, out: &mut Vec<Event>) {
        let tile = self.robot.tile;
        if !self.grid.mow(tile) {
            return;
        }

        out.push(Event::TileMowed { tile });
        if self.grid.tiles_remaining() == 0 {
            info!(mowed = self.grid.tiles_mowed(), "lawn completed");
            out.push(Event::LawnCompleted);
        }
    }
}

fn found_path(
    grid: &GridMap,
    from: TilePosition,
    goal: TilePosition,
) -> Option<(TilePosition, Vec<TilePosition>)> {
    match navigation::find_path(grid, from, goal) {
        PathOutcome::Found(path) => Some((goal, path)),
        PathOutcome::Unreachable => None,
    }
}

fn save_position(robot: &mut Robot, out: &mut Vec<Event>) {
    if robot.saved_position.is_some() {
        return;
    }

    let tile = robot.tile;
    debug!(column = tile.column(), row = tile.row(), "position saved");
    robot.saved_position = Some(tile);
    out.push(Event::PositionSaved { tile });
}

fn transition(robot: &mut Robot, to: RobotState, out: &mut Vec<Event>) {
    let from = robot.state;
    if from == to {
        return;
    }

    debug!(?from, ?to, "robot state changed");
    robot.state = to;
    out.push(Event::StateChanged { from, to });
}
