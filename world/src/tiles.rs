//! Tile codes and the classifier that gives them meaning.

use mower_core::CollisionKind;
use serde::{Deserialize, Serialize};

/// Foreground code marking a tile without any foreground decoration.
pub const NO_FOREGROUND: i32 = -1;

/// Single map cell composed of a background and an optional foreground code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    background: i32,
    foreground: i32,
}

impl Tile {
    /// Creates a tile from its background and foreground codes.
    #[must_use]
    pub const fn new(background: i32, foreground: i32) -> Self {
        Self {
            background,
            foreground,
        }
    }

    /// Background terrain code.
    #[must_use]
    pub const fn background(&self) -> i32 {
        self.background
    }

    /// Foreground code, [`NO_FOREGROUND`] when the tile is bare.
    #[must_use]
    pub const fn foreground(&self) -> i32 {
        self.foreground
    }

    /// Reports whether the tile carries a foreground decoration.
    #[must_use]
    pub const fn has_foreground(&self) -> bool {
        self.foreground != NO_FOREGROUND
    }

    pub(crate) fn set_background(&mut self, background: i32) {
        self.background = background;
    }
}

/// Derived, non-stored properties of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileClass {
    /// Collision category of the tile.
    pub collision: CollisionKind,
    /// Whether the robot recharges while standing on the tile.
    pub charging: bool,
    /// Whether the tile still carries uncut grass.
    pub mowable: bool,
}

/// Lookup tables tying tile codes to the semantics of a specific tile sheet.
///
/// The defaults match the stock lawn sheet: twelve fence codes, four
/// charging pad codes, grass on background `7` and cut grass on `11`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilePalette {
    perimeter_codes: Vec<i32>,
    charging_codes: Vec<i32>,
    grass_code: i32,
    mowed_code: i32,
}

impl TilePalette {
    /// Creates a palette from explicit code tables.
    #[must_use]
    pub fn new(
        perimeter_codes: Vec<i32>,
        charging_codes: Vec<i32>,
        grass_code: i32,
        mowed_code: i32,
    ) -> Self {
        Self {
            perimeter_codes,
            charging_codes,
            grass_code,
            mowed_code,
        }
    }

    /// Foreground codes that form the perimeter.
    #[must_use]
    pub fn perimeter_codes(&self) -> &[i32] {
        &self.perimeter_codes
    }

    /// Background codes that mark charging pads.
    #[must_use]
    pub fn charging_codes(&self) -> &[i32] {
        &self.charging_codes
    }

    /// Background code of uncut grass.
    #[must_use]
    pub const fn grass_code(&self) -> i32 {
        self.grass_code
    }

    /// Background code applied to a tile once it has been mowed.
    #[must_use]
    pub const fn mowed_code(&self) -> i32 {
        self.mowed_code
    }

    /// Collision category of the tile.
    ///
    /// Bare tiles are clear, foregrounds listed as perimeter codes are
    /// perimeter and every other foreground is an obstacle.
    #[must_use]
    pub fn collision_kind(&self, tile: Tile) -> CollisionKind {
        if !tile.has_foreground() {
            return CollisionKind::Clear;
        }

        if self.perimeter_codes.contains(&tile.foreground()) {
            CollisionKind::Perimeter
        } else {
            CollisionKind::Obstacle
        }
    }

    /// Whether the tile's background is a charging pad.
    #[must_use]
    pub fn is_charging(&self, tile: Tile) -> bool {
        self.charging_codes.contains(&tile.background())
    }

    /// Whether the tile is bare uncut grass.
    #[must_use]
    pub fn is_mowable(&self, tile: Tile) -> bool {
        tile.background() == self.grass_code && !tile.has_foreground()
    }

    /// Computes every derived property of the tile at once.
    #[must_use]
    pub fn classify(&self, tile: Tile) -> TileClass {
        TileClass {
            collision: self.collision_kind(tile),
            charging: self.is_charging(tile),
            mowable: self.is_mowable(tile),
        }
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            perimeter_codes: vec![26, 28, 29, 59, 57, 85, 84, 93, 63, 34, 33, 3],
            charging_codes: vec![279, 281, 339, 341],
            grass_code: 7,
            mowed_code: 11,
        }
    }
}
