//! Boundary following used to locate a charging pad.

use mower_core::{CollisionKind, Direction, TilePosition};

use crate::grid::GridMap;

/// Outcome of a single perimeter-following step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerimeterStep {
    /// A new direction was committed and the robot should head that way.
    Committed {
        /// Newly committed direction.
        direction: Direction,
        /// Direction committed before the previous halt.
        previous: Option<Direction>,
    },
    /// The committed direction is still valid.
    Continue,
    /// The committed direction became invalid; the robot must stop on its tile.
    Halted,
    /// No direction other than the reverse of the previous one is valid.
    Stranded,
}

/// Direction memory of the perimeter follower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PerimeterFollower {
    current: Option<Direction>,
    previous: Option<Direction>,
    stranded: bool,
}

impl PerimeterFollower {
    /// Direction the follower is committed to.
    #[must_use]
    pub const fn current(&self) -> Option<Direction> {
        self.current
    }

    /// Direction committed before the last halt.
    #[must_use]
    pub const fn previous(&self) -> Option<Direction> {
        self.previous
    }

    /// Reports whether the last step found no usable direction.
    #[must_use]
    pub const fn is_stranded(&self) -> bool {
        self.stranded
    }

    /// Forgets both the committed and the previous direction.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Advances the follower by one tick.
    ///
    /// `blocked_ahead` is consulted only while a direction is committed and
    /// reports whether a short look-ahead along the current velocity collides.
    pub fn step<F>(&mut self, grid: &GridMap, tile: TilePosition, blocked_ahead: F) -> PerimeterStep
    where
        F: FnOnce() -> bool,
    {
        match self.current {
            Some(direction) => {
                let next = tile.step(direction);
                if grid.has_perimeter_neighbor(next) && !blocked_ahead() {
                    PerimeterStep::Continue
                } else {
                    self.previous = Some(direction);
                    self.current = None;
                    PerimeterStep::Halted
                }
            }
            None => {
                let forbidden = self.previous.map(Direction::opposite);
                let chosen = Direction::CARDINAL
                    .into_iter()
                    .filter(|direction| Some(*direction) != forbidden)
                    .find(|direction| is_valid_move(grid, tile, *direction));

                match chosen {
                    Some(direction) => {
                        self.current = Some(direction);
                        self.stranded = false;
                        PerimeterStep::Committed {
                            direction,
                            previous: self.previous,
                        }
                    }
                    None => {
                        self.stranded = true;
                        PerimeterStep::Stranded
                    }
                }
            }
        }
    }
}

/// Cardinal directions, in scan order, that keep the robot hugging the boundary.
#[must_use]
pub fn valid_directions(grid: &GridMap, tile: TilePosition) -> Vec<Direction> {
    Direction::CARDINAL
        .into_iter()
        .filter(|direction| is_valid_move(grid, tile, *direction))
        .collect()
}

fn is_valid_move(grid: &GridMap, tile: TilePosition, direction: Direction) -> bool {
    let next = tile.step(direction);
    grid.collision_at(next) == Some(CollisionKind::Clear) && grid.has_perimeter_neighbor(next)
}
