//! Breadth-first detour planning around obstacles.

use std::collections::VecDeque;

use mower_core::{CollisionKind, Direction, TilePosition};

use crate::grid::GridMap;

/// Result of a detour search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    /// Shortest 4-connected path, start and goal inclusive.
    Found(Vec<TilePosition>),
    /// The goal cannot be reached from the start.
    Unreachable,
}

impl PathOutcome {
    /// Number of tile-to-tile hops, if a path was found.
    #[must_use]
    pub fn hops(&self) -> Option<usize> {
        match self {
            Self::Found(path) => Some(path.len().saturating_sub(1)),
            Self::Unreachable => None,
        }
    }
}

/// Finds the shortest path between two clear tiles.
///
/// Neighbours are expanded in the order up, down, left, right, so ties between
/// equally short paths resolve the same way on every run. Tiles outside the
/// grid or with any collision are never entered.
#[must_use]
pub fn find_path(grid: &GridMap, start: TilePosition, goal: TilePosition) -> PathOutcome {
    if !grid.is_valid_position(start) || !grid.is_traversable(goal) {
        return PathOutcome::Unreachable;
    }

    let Some(width) = usize::try_from(grid.width()).ok() else {
        return PathOutcome::Unreachable;
    };
    let cell_count = width.saturating_mul(usize::try_from(grid.height()).unwrap_or(0));
    let mut parents: Vec<Option<TilePosition>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();

    if let Some(start_index) = index(width, start) {
        visited[start_index] = true;
        queue.push_back(start);
    }

    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            return PathOutcome::Found(unwind(width, &parents, start, goal));
        }

        for neighbor in neighbors(cell) {
            if !grid.is_traversable(neighbor) {
                continue;
            }

            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    PathOutcome::Unreachable
}

/// Locates the first non-obstacle tile past an obstacle along `heading`.
///
/// Returns `None` when the scan runs off the grid before finding one.
#[must_use]
pub fn detour_target(
    grid: &GridMap,
    from: TilePosition,
    heading: Direction,
) -> Option<TilePosition> {
    let mut candidate = from.step(heading);
    loop {
        match grid.collision_at(candidate)? {
            CollisionKind::Obstacle => candidate = candidate.step(heading),
            CollisionKind::Clear | CollisionKind::Perimeter => return Some(candidate),
        }
    }
}

/// Finds the first clear tile of `row`, scanning from `column` along `heading`.
#[must_use]
pub fn first_clear_in_row(
    grid: &GridMap,
    row: i32,
    column: i32,
    heading: Direction,
) -> Option<TilePosition> {
    let mut candidate = TilePosition::new(column, row);
    while grid.is_valid_position(candidate) {
        if grid.is_traversable(candidate) {
            return Some(candidate);
        }
        candidate = candidate.step(heading);
    }
    None
}

fn unwind(
    width: usize,
    parents: &[Option<TilePosition>],
    start: TilePosition,
    goal: TilePosition,
) -> Vec<TilePosition> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(parent) = index(width, cursor).and_then(|offset| parents[offset]) else {
            break;
        };
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

fn neighbors(cell: TilePosition) -> impl Iterator<Item = TilePosition> {
    Direction::CARDINAL
        .into_iter()
        .map(move |direction| cell.step(direction))
}

fn index(width: usize, cell: TilePosition) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_support::grid_from_rows;

    fn tiles(coords: &[(i32, i32)]) -> Vec<TilePosition> {
        coords
            .iter()
            .map(|(column, row)| TilePosition::new(*column, *row))
            .collect()
    }

    #[test]
    fn finds_exact_shortest_path_through_single_gap() {
        let grid = grid_from_rows(&["..o..", "..o..", "..o..", "..o..", "....."]);
        let outcome = find_path(&grid, TilePosition::new(0, 0), TilePosition::new(4, 0));

        let expected = tiles(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
            (3, 3),
            (3, 2),
            (3, 1),
            (3, 0),
            (4, 0),
        ]);
        assert_eq!(outcome, PathOutcome::Found(expected));
        assert_eq!(outcome.hops(), Some(12));
    }

    #[test]
    fn start_equal_to_goal_is_a_single_tile_path() {
        let grid = grid_from_rows(&["...", "...", "..."]);
        let here = TilePosition::new(1, 1);
        assert_eq!(find_path(&grid, here, here), PathOutcome::Found(vec![here]));
    }

    #[test]
    fn sealed_goal_is_unreachable() {
        let grid = grid_from_rows(&["..o..", "..o..", "..o..", "..o..", "..o.."]);
        let outcome = find_path(&grid, TilePosition::new(0, 0), TilePosition::new(4, 0));
        assert_eq!(outcome, PathOutcome::Unreachable);
        assert_eq!(outcome.hops(), None);
    }

    #[test]
    fn invalid_or_blocked_endpoints_are_unreachable() {
        let grid = grid_from_rows(&["#..", "...", "..o"]);
        assert_eq!(
            find_path(&grid, TilePosition::new(-1, 0), TilePosition::new(1, 1)),
            PathOutcome::Unreachable
        );
        assert_eq!(
            find_path(&grid, TilePosition::new(1, 1), TilePosition::new(3, 3)),
            PathOutcome::Unreachable
        );
        assert_eq!(
            find_path(&grid, TilePosition::new(1, 1), TilePosition::new(2, 2)),
            PathOutcome::Unreachable
        );
        assert_eq!(
            find_path(&grid, TilePosition::new(1, 1), TilePosition::new(0, 0)),
            PathOutcome::Unreachable
        );
    }

    #[test]
    fn detour_target_skips_consecutive_obstacles() {
        let grid = grid_from_rows(&["#######", "#.oo..#", "#######"]);
        assert_eq!(
            detour_target(&grid, TilePosition::new(1, 1), Direction::Right),
            Some(TilePosition::new(4, 1))
        );
    }

    #[test]
    fn detour_target_stops_on_perimeter_or_grid_edge() {
        let grid = grid_from_rows(&["#.oo#"]);
        assert_eq!(
            detour_target(&grid, TilePosition::new(1, 0), Direction::Right),
            Some(TilePosition::new(4, 0))
        );

        let open = grid_from_rows(&[".oo"]);
        assert_eq!(
            detour_target(&open, TilePosition::new(0, 0), Direction::Right),
            None
        );
    }

    #[test]
    fn first_clear_in_row_scans_along_heading() {
        let grid = grid_from_rows(&["#####", "#.oo#", "#####"]);
        assert_eq!(
            first_clear_in_row(&grid, 1, 3, Direction::Left),
            Some(TilePosition::new(1, 1))
        );
        assert_eq!(first_clear_in_row(&grid, 1, 2, Direction::Right), None);
    }
}
