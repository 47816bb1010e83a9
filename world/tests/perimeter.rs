use std::time::Duration;

use mower_core::{Command, Direction, Event, RobotState, TilePosition};
use mower_world::{self as world, query, GridMap, SimulationConfig, Tile, TilePalette, World};

const DT: Duration = Duration::from_millis(10);

fn ring(size: usize) -> GridMap {
    let mut tiles = Vec::with_capacity(size * size);
    for row in 0..size {
        for column in 0..size {
            let edge = row == 0 || column == 0 || row == size - 1 || column == size - 1;
            tiles.push(if edge { Tile::new(7, 26) } else { Tile::new(7, -1) });
        }
    }
    GridMap::new(size as u32, size as u32, tiles, TilePalette::default()).expect("valid ring")
}

fn drained_world() -> World {
    let config = SimulationConfig {
        discharge_seconds: 1,
        ..SimulationConfig::default()
    };
    let mut world = World::new(ring(10), config).expect("valid world");
    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    world
}

fn chosen_directions(world: &mut World, ticks: usize) -> Vec<(Direction, Option<Direction>)> {
    let mut chosen = Vec::new();
    for _ in 0..ticks {
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt: DT }, &mut events);
        chosen.extend(events.into_iter().filter_map(|event| match event {
            Event::PerimeterDirectionChosen {
                direction,
                previous,
            } => Some((direction, previous)),
            _ => None,
        }));
    }
    chosen
}

#[test]
fn follower_never_reverses_its_previous_direction() {
    let mut world = drained_world();
    let chosen = chosen_directions(&mut world, 4_000);

    assert!(chosen.len() > 8, "follower only chose {} directions", chosen.len());
    for (direction, previous) in &chosen {
        assert_ne!(Some(direction.opposite()), *previous);
    }
}

#[test]
fn follower_circles_the_ring_clockwise_from_the_first_corner() {
    let mut world = drained_world();
    let chosen = chosen_directions(&mut world, 4_000);

    assert_eq!(
        &chosen[..5],
        &[
            (Direction::Down, None),
            (Direction::Left, Some(Direction::Down)),
            (Direction::Up, Some(Direction::Left)),
            (Direction::Right, Some(Direction::Up)),
            (Direction::Down, Some(Direction::Right)),
        ]
    );

    let robot = query::robot_model(&world);
    assert_eq!(robot.state(), RobotState::LookupChargeStation);
    assert_eq!(robot.saved_position(), Some(TilePosition::new(8, 1)));
    assert!(robot.battery().is_empty());
}

#[test]
fn follower_stays_on_tiles_touching_the_perimeter() {
    let mut world = drained_world();
    let mut in_lookup = false;
    for _ in 0..4_000 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: DT }, &mut events);
        let snapshot = query::robot(&world);
        in_lookup |= snapshot.state == RobotState::LookupChargeStation;
        if in_lookup {
            assert!(query::grid(&world).has_perimeter_neighbor(snapshot.tile));
            assert!(query::grid(&world).is_traversable(snapshot.tile));
        }
    }
    assert!(in_lookup);
}
