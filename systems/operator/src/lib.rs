#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates operator input into world commands.
//!
//! Holding a heading key steers the robot manually. Letting go of the last
//! held key restarts the sweep from wherever the robot ended up.

use mower_core::{Command, Direction};

/// Discrete operator actions delivered by an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// Starts, or restarts, the sweep.
    Start,
    /// Parks the robot at its origin.
    Reset,
    /// A heading key went down.
    HeadingPressed(Direction),
    /// A heading key came back up.
    HeadingReleased(Direction),
}

/// Pure system that turns operator input into commands.
#[derive(Debug, Default)]
pub struct Operator {
    held: Vec<Direction>,
}

impl Operator {
    /// Creates an operator with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading keys currently held, oldest first.
    #[must_use]
    pub fn held(&self) -> &[Direction] {
        &self.held
    }

    /// Consumes a batch of operator input and emits the matching commands.
    pub fn handle(&mut self, inputs: &[Input], out: &mut Vec<Command>) {
        for input in inputs {
            match *input {
                Input::Start => out.push(Command::Start),
                Input::Reset => {
                    self.held.clear();
                    out.push(Command::Reset);
                }
                Input::HeadingPressed(direction) => {
                    if !self.held.contains(&direction) {
                        self.held.push(direction);
                    }
                    out.push(Command::SetHeading { direction });
                }
                Input::HeadingReleased(direction) => self.release(direction, out),
            }
        }
    }

    fn release(&mut self, direction: Direction, out: &mut Vec<Command>) {
        let Some(index) = self.held.iter().position(|held| *held == direction) else {
            return;
        };
        let _ = self.held.remove(index);

        match self.held.last() {
            Some(&still_held) => out.push(Command::SetHeading {
                direction: still_held,
            }),
            None => out.push(Command::Start),
        }
    }
}
