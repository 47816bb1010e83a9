//! Plain-text map sources.
//!
//! A map is a whitespace separated list of integers: the width and height,
//! followed by `height * width` background codes and then `height * width`
//! foreground codes, both in row-major order.

use std::{fs, path::Path};

use crate::{
    error::MapError,
    grid::GridMap,
    tiles::{Tile, TilePalette},
};

/// Reads and parses the map stored at `path`.
pub fn load_map(path: impl AsRef<Path>, palette: TilePalette) -> Result<GridMap, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text, palette)
}

/// Parses a map from its textual representation.
pub fn parse_map(text: &str, palette: TilePalette) -> Result<GridMap, MapError> {
    let mut tokens = text.split_whitespace().enumerate();

    let width = parse_token::<i64>(tokens.next())?;
    let height = parse_token::<i64>(tokens.next())?;

    let (Ok(columns), Ok(rows)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(MapError::InvalidDimensions { width, height });
    };
    if columns == 0 || rows == 0 {
        return Err(MapError::InvalidDimensions { width, height });
    }

    let cell_count = usize::try_from(u64::from(columns) * u64::from(rows))
        .map_err(|_| MapError::InvalidDimensions { width, height })?;

    let layers = tokens
        .map(|token| parse_token::<i32>(Some(token)))
        .collect::<Result<Vec<i32>, MapError>>()?;

    let expected = cell_count.saturating_mul(2);
    if layers.len() != expected {
        return Err(MapError::TileCountMismatch {
            expected,
            found: layers.len(),
        });
    }

    let (backgrounds, foregrounds) = layers.split_at(cell_count);
    let tiles = backgrounds
        .iter()
        .zip(foregrounds)
        .map(|(background, foreground)| Tile::new(*background, *foreground))
        .collect();

    GridMap::new(columns, rows, tiles, palette)
}

fn parse_token<T: std::str::FromStr>(token: Option<(usize, &str)>) -> Result<T, MapError> {
    let (index, text) = token.ok_or(MapError::MissingDimensions)?;
    text.parse().map_err(|_| MapError::InvalidToken {
        index,
        token: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use mower_core::{CollisionKind, TilePosition};

    use super::*;

    const SMALL_MAP: &str = "3 2
        7 7 279
        7 7 7
        26 -1 -1
        -1 150 -1";

    #[test]
    fn parses_background_then_foreground_layers() {
        let grid = parse_map(SMALL_MAP, TilePalette::default()).expect("map parses");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(
            grid.collision_at(TilePosition::new(0, 0)),
            Some(CollisionKind::Perimeter)
        );
        assert_eq!(
            grid.collision_at(TilePosition::new(1, 1)),
            Some(CollisionKind::Obstacle)
        );
        assert!(grid.is_charging(TilePosition::new(2, 0)));
        assert_eq!(grid.tiles_remaining(), 3);
    }

    #[test]
    fn missing_header_is_reported() {
        assert!(matches!(
            parse_map("", TilePalette::default()),
            Err(MapError::MissingDimensions)
        ));
        assert!(matches!(
            parse_map("4", TilePalette::default()),
            Err(MapError::MissingDimensions)
        ));
    }

    #[test]
    fn non_numeric_tokens_are_reported_with_their_index() {
        let result = parse_map("1 1 7 grass", TilePalette::default());
        match result {
            Err(MapError::InvalidToken { index, token }) => {
                assert_eq!(index, 3);
                assert_eq!(token, "grass");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(matches!(
            parse_map("0 3", TilePalette::default()),
            Err(MapError::InvalidDimensions {
                width: 0,
                height: 3
            })
        ));
        assert!(matches!(
            parse_map("2 -1", TilePalette::default()),
            Err(MapError::InvalidDimensions {
                width: 2,
                height: -1
            })
        ));
    }

    #[test]
    fn truncated_layers_are_rejected() {
        assert!(matches!(
            parse_map("2 1 7 7 -1", TilePalette::default()),
            Err(MapError::TileCountMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let path = Path::new("definitely/not/a/map.txt");
        match load_map(path, TilePalette::default()) {
            Err(MapError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
