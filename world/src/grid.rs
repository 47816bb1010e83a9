//! Discrete tile grid the robot mows.

use mower_core::{CollisionKind, Direction, MowingProgress, TilePosition};

use crate::{
    error::MapError,
    tiles::{Tile, TilePalette},
};

/// Row-major tile grid together with its palette and mowing counters.
///
/// Every query accepts arbitrary coordinates; positions outside the grid are
/// reported as invalid (`None` or `false`) instead of failing.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    palette: TilePalette,
    remaining: u32,
    mowed: u32,
}

impl GridMap {
    /// Builds a grid from row-major tiles, counting the mowable ones.
    pub fn new(
        width: u32,
        height: u32,
        tiles: Vec<Tile>,
        palette: TilePalette,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::InvalidDimensions {
                width: i64::from(width),
                height: i64::from(height),
            });
        }

        let expected = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX);
        if tiles.len() != expected {
            return Err(MapError::TileCountMismatch {
                expected,
                found: tiles.len(),
            });
        }

        let mowable = tiles
            .iter()
            .filter(|tile| palette.is_mowable(**tile))
            .count();

        Ok(Self {
            width,
            height,
            tiles,
            palette,
            remaining: u32::try_from(mowable).unwrap_or(u32::MAX),
            mowed: 0,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Palette used to classify the grid's tiles.
    #[must_use]
    pub const fn palette(&self) -> &TilePalette {
        &self.palette
    }

    /// Mowable tiles still waiting to be cut.
    #[must_use]
    pub const fn tiles_remaining(&self) -> u32 {
        self.remaining
    }

    /// Tiles cut so far.
    #[must_use]
    pub const fn tiles_mowed(&self) -> u32 {
        self.mowed
    }

    /// Snapshot of both mowing counters.
    #[must_use]
    pub const fn progress(&self) -> MowingProgress {
        MowingProgress {
            remaining: self.remaining,
            mowed: self.mowed,
        }
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn is_valid_position(&self, position: TilePosition) -> bool {
        self.index(position).is_some()
    }

    /// Tile stored at the position, if it lies inside the grid.
    #[must_use]
    pub fn tile_at(&self, position: TilePosition) -> Option<Tile> {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Collision category at the position, if it lies inside the grid.
    #[must_use]
    pub fn collision_at(&self, position: TilePosition) -> Option<CollisionKind> {
        self.tile_at(position)
            .map(|tile| self.palette.collision_kind(tile))
    }

    /// Reports whether the position is inside the grid and clear of obstacles.
    #[must_use]
    pub fn is_traversable(&self, position: TilePosition) -> bool {
        self.collision_at(position) == Some(CollisionKind::Clear)
    }

    /// Reports whether the position is a charging pad.
    #[must_use]
    pub fn is_charging(&self, position: TilePosition) -> bool {
        self.tile_at(position)
            .is_some_and(|tile| self.palette.is_charging(tile))
    }

    /// Reports whether the position still carries uncut grass.
    #[must_use]
    pub fn is_mowable(&self, position: TilePosition) -> bool {
        self.tile_at(position)
            .is_some_and(|tile| self.palette.is_mowable(tile))
    }

    /// Reports whether any of the eight surrounding tiles is a perimeter tile.
    #[must_use]
    pub fn has_perimeter_neighbor(&self, position: TilePosition) -> bool {
        Direction::NEIGHBORHOOD.iter().any(|direction| {
            self.collision_at(position.step(*direction)) == Some(CollisionKind::Perimeter)
        })
    }

    /// Cuts the grass at the position.
    ///
    /// Returns `true` when the tile switched to its mowed appearance. Invalid
    /// positions and tiles that are not mowable (including tiles mowed
    /// earlier) leave the grid and its counters untouched.
    pub fn mow(&mut self, position: TilePosition) -> bool {
        if !self.is_mowable(position) {
            return false;
        }

        let mowed_code = self.palette.mowed_code();
        let Some(tile) = self
            .index(position)
            .and_then(|index| self.tiles.get_mut(index))
        else {
            return false;
        };

        tile.set_background(mowed_code);
        self.remaining = self.remaining.saturating_sub(1);
        self.mowed = self.mowed.saturating_add(1);
        true
    }

    fn index(&self, position: TilePosition) -> Option<usize> {
        let column = u32::try_from(position.column()).ok()?;
        let row = u32::try_from(position.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
