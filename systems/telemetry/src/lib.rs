#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Telemetry system that tallies run statistics and formats the status readout.

use std::{fmt, time::Duration};

use mower_core::{Event, MowingProgress, RobotSnapshot, RobotState};

const START_PROMPT: &str = "Press space to start!";
const COMPLETION_BANNER: &str = "ROBOT FINISHED MOWING THE AREA";

/// Counters accumulated over the lifetime of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Ticks observed.
    pub ticks: u64,
    /// Simulated time covered by the observed ticks.
    pub simulated: Duration,
    /// Tiles cut.
    pub tiles_mowed: u32,
    /// Times the battery ran empty.
    pub depletions: u32,
    /// Completed recharge cycles.
    pub recharges: u32,
    /// Detours planned around obstacles.
    pub detours_planned: u32,
    /// Detours that could not be planned.
    pub detours_unavailable: u32,
    /// Controller state transitions.
    pub transitions: u32,
    /// Whether the lawn was reported complete.
    pub completed: bool,
}

impl RunStatistics {
    fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { dt } => {
                self.ticks = self.ticks.saturating_add(1);
                self.simulated = self.simulated.saturating_add(*dt);
            }
            Event::TileMowed { .. } => self.tiles_mowed = self.tiles_mowed.saturating_add(1),
            Event::BatteryDepleted { .. } => self.depletions = self.depletions.saturating_add(1),
            Event::RechargeCompleted { .. } => self.recharges = self.recharges.saturating_add(1),
            Event::DetourPlanned { .. } => {
                self.detours_planned = self.detours_planned.saturating_add(1);
            }
            Event::DetourUnavailable { .. } => {
                self.detours_unavailable = self.detours_unavailable.saturating_add(1);
            }
            Event::StateChanged { .. } => self.transitions = self.transitions.saturating_add(1),
            Event::LawnCompleted => self.completed = true,
            Event::PositionSaved { .. }
            | Event::PerimeterDirectionChosen { .. }
            | Event::ChargingStarted { .. }
            | Event::SweepResumed { .. } => {}
        }
    }
}

/// Status lines describing the robot and the lawn after a step.
#[derive(Clone, Debug, PartialEq)]
pub struct HudReadout {
    tiles_to_mow: String,
    tiles_mowed: String,
    tile: String,
    time: String,
    battery: String,
    charges: String,
    banner: Option<&'static str>,
}

impl HudReadout {
    /// Formats the readout for the provided robot snapshot and mowing counters.
    #[must_use]
    pub fn new(snapshot: &RobotSnapshot, progress: MowingProgress) -> Self {
        let banner = if progress.is_complete() {
            Some(COMPLETION_BANNER)
        } else if snapshot.state == RobotState::Stop {
            Some(START_PROMPT)
        } else {
            None
        };

        Self {
            tiles_to_mow: format!("Tiles to mow: {}", progress.remaining),
            tiles_mowed: format!("Tiles mowed: {}", progress.mowed),
            tile: format!(
                "Tile #: X: {} Y: {}",
                snapshot.tile.column(),
                snapshot.tile.row()
            ),
            time: format!("Time: {:.4} hrs", snapshot.elapsed_hours),
            battery: format!("Battery: {:.2}%", snapshot.battery_percent),
            charges: format!("Charges: {}", snapshot.recharge_count),
            banner,
        }
    }

    /// Status lines in display order, without the banner.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            &self.tiles_to_mow,
            &self.tiles_mowed,
            &self.tile,
            &self.time,
            &self.battery,
            &self.charges,
        ]
        .into_iter()
        .map(String::as_str)
    }

    /// Start prompt or completion banner, when one applies.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        self.banner
    }
}

impl fmt::Display for HudReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in self.lines().chain(self.banner) {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(line)?;
            first = false;
        }
        Ok(())
    }
}

/// Pure telemetry system fed with world events and snapshots.
#[derive(Debug, Default)]
pub struct Telemetry {
    statistics: RunStatistics,
    readout: Option<HudReadout>,
}

impl Telemetry {
    /// Creates a telemetry system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Readout produced by the most recent call to [`Telemetry::handle`].
    #[must_use]
    pub fn readout(&self) -> Option<&HudReadout> {
        self.readout.as_ref()
    }

    /// Consumes the events of a step together with the state observed after it.
    pub fn handle(&mut self, events: &[Event], snapshot: &RobotSnapshot, progress: MowingProgress) {
        for event in events {
            self.statistics.record(event);
        }
        self.readout = Some(HudReadout::new(snapshot, progress));
    }
}
