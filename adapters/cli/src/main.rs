#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the lawn mower simulation headlessly.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use mower_system_operator::Input;
use mower_world::{load_map, parse_map, query, GridMap, SimulationConfig, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::session::{Session, Status};

const BUNDLED_MAP: &str = include_str!("../maps/garden.dat");

/// Runs the lawn mower robot simulation without a window.
#[derive(Debug, Parser)]
#[command(name = "mower", version)]
struct Cli {
    /// Map file to mow. The bundled garden is used when omitted.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
    /// TOML file overriding the simulation settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for bounce randomness, taking precedence over the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 100_000)]
    frames: u64,
    /// Duration of each simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Logs the status readout every N frames. Zero disables periodic reports.
    #[arg(long, default_value_t = 500)]
    report_every: u64,
}

/// Entry point for the lawn mower command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.seed)?;
    let grid = load_grid(cli.map.as_deref(), &config)?;
    info!(
        width = grid.width(),
        height = grid.height(),
        mowable = grid.tiles_remaining(),
        "map loaded"
    );

    let world = World::new(grid, config).context("invalid simulation configuration")?;
    let mut session = Session::new(world);
    session.input(&[Input::Start]);

    let status = run(
        &mut session,
        Duration::from_millis(cli.frame_ms),
        cli.frames,
        cli.report_every,
    );
    report(&session, status);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

fn load_grid(path: Option<&Path>, config: &SimulationConfig) -> Result<GridMap> {
    match path {
        Some(path) => load_map(path, config.palette.clone())
            .with_context(|| format!("failed to load map {}", path.display())),
        None => parse_map(BUNDLED_MAP, config.palette.clone()).context("bundled map is malformed"),
    }
}

fn run(session: &mut Session, frame: Duration, frames: u64, report_every: u64) -> Status {
    let mut status = session.status();
    for index in 1..=frames {
        status = session.frame(frame);
        if report_every > 0 && index % report_every == 0 {
            if let Some(readout) = session.telemetry().readout() {
                info!(frame = index, %readout, "progress");
            }
        }
        if status != Status::Running {
            break;
        }
    }
    status
}

fn report(session: &Session, status: Status) {
    match status {
        Status::Completed => info!("lawn completed"),
        Status::Stopped => warn!("robot stopped before the lawn was complete"),
        Status::Running => warn!("frame budget exhausted while the robot was still running"),
    }

    if let Some(readout) = session.telemetry().readout() {
        for line in readout.lines() {
            println!("{line}");
        }
        if let Some(banner) = readout.banner() {
            println!("{banner}");
        }
    }

    let statistics = session.telemetry().statistics();
    println!(
        "Ticks: {} | Simulated: {:.2?} | Depletions: {} | Recharges: {} | Detours: {} planned, {} unavailable | Transitions: {}",
        statistics.ticks,
        statistics.simulated,
        statistics.depletions,
        statistics.recharges,
        statistics.detours_planned,
        statistics.detours_unavailable,
        statistics.transitions,
    );
    println!(
        "Final tick index: {}",
        query::tick_index(session.world())
    );
}
