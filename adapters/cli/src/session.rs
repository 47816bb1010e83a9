//! Wires the frame clock, operator, world and telemetry into one loop.

use std::time::Duration;

use mower_core::{Command, Event, RobotState};
use mower_system_clock::{Config as ClockConfig, FrameClock};
use mower_system_operator::{Input, Operator};
use mower_system_telemetry::Telemetry;
use mower_world::{self as world, query, World};

/// How a session stands after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Running,
    Completed,
    Stopped,
}

#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    clock: FrameClock,
    operator: Operator,
    telemetry: Telemetry,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        let config = query::config(&world);
        let clock = FrameClock::new(ClockConfig::new(config.time_slice(), config.max_frame()));
        let mut session = Self {
            world,
            clock,
            operator: Operator::new(),
            telemetry: Telemetry::new(),
            commands: Vec::new(),
            events: Vec::new(),
        };
        session.publish();
        session
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Routes operator input to the world between frames.
    pub(crate) fn input(&mut self, inputs: &[Input]) {
        self.operator.handle(inputs, &mut self.commands);
        self.flush();
    }

    /// Feeds one rendered frame through the clock and applies the resulting ticks.
    pub(crate) fn frame(&mut self, frame: Duration) -> Status {
        self.clock.handle(frame, &mut self.commands);
        self.flush();
        self.status()
    }

    pub(crate) fn status(&self) -> Status {
        if query::robot(&self.world).state != RobotState::Stop {
            Status::Running
        } else if query::progress(&self.world).is_complete() {
            Status::Completed
        } else {
            Status::Stopped
        }
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.publish();
    }

    fn publish(&mut self) {
        self.telemetry.handle(
            &self.events,
            &query::robot(&self.world),
            query::progress(&self.world),
        );
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use mower_world::{parse_map, SimulationConfig, TilePalette};

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn session() -> Session {
        let grid = parse_map(
            "4 4
             7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7
             26 26 26 26
             26 -1 -1 26
             26 -1 -1 26
             26 26 26 26",
            TilePalette::default(),
        )
        .expect("map parses");
        Session::new(World::new(grid, SimulationConfig::default()).expect("valid world"))
    }

    #[test]
    fn idle_session_reports_stopped() {
        let mut session = session();
        assert_eq!(session.status(), Status::Stopped);
        assert_eq!(session.frame(FRAME), Status::Stopped);
        assert_eq!(session.telemetry().statistics().ticks, 1);
    }

    #[test]
    fn started_session_runs_to_completion() {
        let mut session = session();
        session.input(&[Input::Start]);
        assert_eq!(session.status(), Status::Running);

        let mut status = Status::Running;
        for _ in 0..500 {
            status = session.frame(FRAME);
            if status != Status::Running {
                break;
            }
        }

        assert_eq!(status, Status::Completed);
        assert_eq!(query::progress(session.world()).mowed, 4);
        assert!(session.telemetry().statistics().completed);
        assert_eq!(session.telemetry().statistics().transitions, 4);
    }
}
