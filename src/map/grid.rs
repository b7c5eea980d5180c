//! Rectangular grid of map cells.

use super::tile::TileSpec;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};

/// Map cells in row-major order.
///
/// The tile count always equals `width * height`; the only ways to build a
/// grid check it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct MapGrid {
    width: u8,
    height: u8,
    tiles: Vec<TileSpec>,
}

impl MapGrid {
    /// Build a grid from row-major tiles.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] if `tiles.len() != width * height`.
    pub fn new(width: u8, height: u8, tiles: Vec<TileSpec>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(Error::InvalidFormat(format!(
                "{width}x{height} grid needs {expected} tiles, got {}",
                tiles.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// For callers that produce exactly `width * height` tiles by construction.
    pub(crate) fn from_parts(width: u8, height: u8, tiles: Vec<TileSpec>) -> Self {
        debug_assert_eq!(tiles.len(), width as usize * height as usize);
        Self {
            width,
            height,
            tiles,
        }
    }

    /// A grid with every cell set to `tile`.
    pub fn filled(width: u8, height: u8, tile: TileSpec) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    /// Mutable access to the cells; the count cannot change.
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [TileSpec] {
        &mut self.tiles
    }

    pub fn into_tiles(self) -> Vec<TileSpec> {
        self.tiles
    }

    /// Row-major index of `(x, y)`, if inside the grid.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width as usize && y < self.height as usize).then(|| y * self.width as usize + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&TileSpec> {
        self.index_of(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut TileSpec> {
        self.index_of(x, y).map(|i| &mut self.tiles[i])
    }

    /// Validate every cell, reporting the first bad one by index.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        for (index, tile) in self.tiles.iter().enumerate() {
            tile.validate(max_depth).map_err(|e| e.at_tile(index))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct GridRef<'a> {
    width: u8,
    height: u8,
    tiles: &'a [TileSpec],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridRepr {
    width: u8,
    height: u8,
    tiles: Vec<TileSpec>,
}

impl TryFrom<GridRepr> for MapGrid {
    type Error = Error;

    fn try_from(repr: GridRepr) -> Result<Self> {
        MapGrid::new(repr.width, repr.height, repr.tiles)
    }
}

impl Serialize for MapGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GridRef {
            width: self.width,
            height: self.height,
            tiles: &self.tiles,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use crate::map::catalog::TileId;

    #[test]
    fn test_length_invariant() {
        let tiles = vec![TileSpec::new(TileId::FLOOR); 5];
        let err = MapGrid::new(2, 3, tiles).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(MapGrid::new(0, 7, Vec::new()).is_ok());
    }

    #[test]
    fn test_indexing() {
        let mut grid = MapGrid::filled(3, 2, TileSpec::new(TileId::FLOOR));
        assert_eq!(grid.index_of(2, 1), Some(5));
        assert_eq!(grid.index_of(3, 0), None);
        if let Some(cell) = grid.get_mut(1, 1) {
            *cell = TileSpec::new(TileId::WALL);
        }
        assert_eq!(grid.tiles()[4].tile, TileId::WALL);
        assert_eq!(grid.get(1, 1).map(|t| t.tile), Some(TileId::WALL));
    }

    #[test]
    fn test_serde_checks_length() {
        let json = r#"{"width":2,"height":1,"tiles":["FLOOR","WALL"]}"#;
        let grid: MapGrid = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&grid).unwrap(), json);

        let short = r#"{"width":2,"height":2,"tiles":["FLOOR"]}"#;
        assert!(serde_json::from_str::<MapGrid>(short).is_err());
    }
}
