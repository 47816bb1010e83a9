//! Error types surfaced while preparing a simulation.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a map source cannot be turned into a [`GridMap`](crate::GridMap).
#[derive(Debug, Error)]
pub enum MapError {
    /// The map file could not be read.
    #[error("failed to read map file {path}")]
    Io {
        /// Location of the map file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The source ended before both dimensions were read.
    #[error("map source is missing its width and height header")]
    MissingDimensions,
    /// A token could not be parsed as an integer tile code.
    #[error("token #{index} ({token:?}) is not an integer")]
    InvalidToken {
        /// Zero-based index of the offending token.
        index: usize,
        /// Raw token text.
        token: String,
    },
    /// Width or height is zero or negative.
    #[error("map dimensions {width}x{height} are not positive")]
    InvalidDimensions {
        /// Parsed width.
        width: i64,
        /// Parsed height.
        height: i64,
    },
    /// The number of tiles does not match the declared dimensions.
    #[error("expected {expected} tile codes but found {found}")]
    TileCountMismatch {
        /// Number of codes implied by the dimensions.
        expected: usize,
        /// Number of codes actually supplied.
        found: usize,
    },
}

/// Reasons a [`SimulationConfig`](crate::SimulationConfig) is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Tile size must be a positive, finite number of pixels.
    #[error("tile size must be positive, got {0}")]
    TileSize(f32),
    /// The robot must fit inside a single tile.
    #[error("robot half size {half_size} must be positive and below half the tile size {tile_size}")]
    RobotSize {
        /// Configured half size.
        half_size: f32,
        /// Configured tile size.
        tile_size: f32,
    },
    /// Speed must be a positive, finite number of pixels per second.
    #[error("speed must be positive, got {0}")]
    Speed(f32),
    /// A single tick must not carry the robot across a whole tile.
    #[error("a tick moves the robot {step} px, which must stay below the tile size {tile_size}")]
    StepLength {
        /// Distance covered per tick.
        step: f32,
        /// Configured tile size.
        tile_size: f32,
    },
    /// A full battery must last at least one tile crossing.
    #[error("discharge duration must be at least one second")]
    DischargeDuration,
    /// Charging must make progress every tick.
    #[error("charge rate must be between 1 and 100 percent per tick, got {0}")]
    ChargeRate(u32),
}
