use std::time::Duration;

use glam::Vec2;
use mower_core::{
    Command, Direction, Event, MowingProgress, RobotSnapshot, RobotState, TilePosition,
};
use mower_system_telemetry::{HudReadout, Telemetry};
use mower_world::{self as world, parse_map, query, SimulationConfig, TilePalette, World};

const DT: Duration = Duration::from_millis(10);

fn snapshot(state: RobotState) -> RobotSnapshot {
    RobotSnapshot {
        position: Vec2::new(40.0, 56.0),
        screen_anchor: Vec2::new(35.0, 51.0),
        velocity: Vec2::ZERO,
        tile: TilePosition::new(2, 3),
        state,
        battery_percent: 87.5,
        elapsed_hours: 1.25,
        recharge_count: 2,
    }
}

#[test]
fn readout_formats_every_line() {
    let readout = HudReadout::new(
        &snapshot(RobotState::Moving),
        MowingProgress {
            remaining: 12,
            mowed: 40,
        },
    );

    assert_eq!(
        readout.lines().collect::<Vec<_>>(),
        vec![
            "Tiles to mow: 12",
            "Tiles mowed: 40",
            "Tile #: X: 2 Y: 3",
            "Time: 1.2500 hrs",
            "Battery: 87.50%",
            "Charges: 2",
        ]
    );
    assert_eq!(readout.banner(), None);
}

#[test]
fn stopped_robot_shows_the_start_prompt() {
    let readout = HudReadout::new(
        &snapshot(RobotState::Stop),
        MowingProgress {
            remaining: 3,
            mowed: 0,
        },
    );
    assert_eq!(readout.banner(), Some("Press space to start!"));
    assert!(readout.to_string().ends_with(" | Press space to start!"));
}

#[test]
fn finished_lawn_shows_the_completion_banner() {
    let readout = HudReadout::new(
        &snapshot(RobotState::Stop),
        MowingProgress {
            remaining: 0,
            mowed: 64,
        },
    );
    assert_eq!(readout.banner(), Some("ROBOT FINISHED MOWING THE AREA"));
}

#[test]
fn statistics_count_each_event_kind() {
    let mut telemetry = Telemetry::new();
    let events = [
        Event::TimeAdvanced { dt: DT },
        Event::TimeAdvanced { dt: DT },
        Event::TileMowed {
            tile: TilePosition::new(1, 1),
        },
        Event::BatteryDepleted {
            tile: TilePosition::new(4, 1),
        },
        Event::DetourPlanned {
            goal: TilePosition::new(5, 1),
            hops: 4,
        },
        Event::DetourUnavailable {
            from: TilePosition::new(3, 1),
        },
        Event::StateChanged {
            from: RobotState::Moving,
            to: RobotState::FollowingPath,
        },
        Event::PerimeterDirectionChosen {
            direction: Direction::Down,
            previous: None,
        },
        Event::RechargeCompleted { count: 1 },
    ];

    telemetry.handle(
        &events,
        &snapshot(RobotState::FollowingPath),
        MowingProgress::default(),
    );

    let statistics = telemetry.statistics();
    assert_eq!(statistics.ticks, 2);
    assert_eq!(statistics.simulated, Duration::from_millis(20));
    assert_eq!(statistics.tiles_mowed, 1);
    assert_eq!(statistics.depletions, 1);
    assert_eq!(statistics.detours_planned, 1);
    assert_eq!(statistics.detours_unavailable, 1);
    assert_eq!(statistics.transitions, 1);
    assert_eq!(statistics.recharges, 1);
    assert!(!statistics.completed);
    assert!(telemetry.readout().is_some());
}

#[test]
fn telemetry_follows_a_complete_sweep() {
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
    let mut world = World::new(grid, SimulationConfig::default()).expect("valid world");
    let mut telemetry = Telemetry::new();

    let mut events = Vec::new();
    world::apply(&mut world, Command::Start, &mut events);
    for _ in 0..1_000 {
        world::apply(&mut world, Command::Tick { dt: DT }, &mut events);
        telemetry.handle(&events, &query::robot(&world), query::progress(&world));
        events.clear();
        if query::robot(&world).state == RobotState::Stop {
            break;
        }
    }

    let statistics = telemetry.statistics();
    assert!(statistics.completed);
    assert_eq!(statistics.tiles_mowed, 4);
    assert_eq!(
        telemetry.readout().and_then(HudReadout::banner),
        Some("ROBOT FINISHED MOWING THE AREA")
    );
}
