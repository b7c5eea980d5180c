//! Tile byte grammar.
//!
//! A map payload is `width: u8`, `height: u8`, then one tile per cell. Each
//! layer of a tile is:
//!
//! ```text
//! ( width-tag value )*  identifier  shape-bytes
//! ```
//!
//! where the width tag (0x76, 0x77, 0x78) announces a 1-, 2- or 4-byte
//! little-endian modifier value for this layer. Shape bytes are a direction,
//! a canopy mask, or a direction plus arrow mask, depending on the
//! identifier. Every shape except terminal continues with the next layer.

use super::catalog::{MODIFIER_8BIT, MODIFIER_16BIT, MODIFIER_32BIT, TileId, TileShape};
use super::direction::{Direction, DirectionSet};
use super::grid::MapGrid;
use super::modifier::Modifier;
use super::tile::{ThinWallCanopy, TileSpec};
use crate::common::{ByteWriter, Cursor, Error, Result};
use crate::config::CodecOptions;

/// Decode a map payload with default options.
pub fn decode_map(bytes: &[u8]) -> Result<MapGrid> {
    decode_map_with(bytes, &CodecOptions::default())
}

/// Decode a map payload.
///
/// # Errors
///
/// - [`Error::UnexpectedEndOfInput`] if the payload ends inside a tile
/// - [`Error::InvalidFormat`] for a malformed direction or mask byte, a tile
///   deeper than `options.max_tile_depth`, or bytes left after the last tile
/// - [`Error::UnsupportedValue`] for a modifier the layer has no rule for
///
/// Tile errors carry the cell index.
///
/// # Examples
///
/// ```
/// use c2m::map::{decode_map, TileId};
///
/// // 1x1 grid: a chip facing east on floor
/// let grid = decode_map(&[1, 1, 0x16, 0x01, 0x01]).unwrap();
/// assert_eq!(grid.tiles()[0].tile, TileId::CHIP);
/// ```
pub fn decode_map_with(bytes: &[u8], options: &CodecOptions) -> Result<MapGrid> {
    let mut cursor = Cursor::new(bytes);
    let width = cursor.read_u8()?;
    let height = cursor.read_u8()?;
    let count = width as usize * height as usize;

    let mut tiles = Vec::with_capacity(count);
    for index in 0..count {
        let tile = read_tile(&mut cursor, options.max_tile_depth).map_err(|e| e.at_tile(index))?;
        tiles.push(tile);
    }

    if !cursor.is_empty() {
        return Err(Error::InvalidFormat(format!(
            "{} trailing bytes after {width}x{height} map at offset {:#x}",
            cursor.remaining(),
            cursor.position()
        )));
    }
    MapGrid::new(width, height, tiles)
}

/// Encode a map payload with default options.
pub fn encode_map(grid: &MapGrid) -> Result<Vec<u8>> {
    encode_map_with(grid, &CodecOptions::default())
}

/// Encode a map payload.
///
/// Modifiers are written in canonical order, zero values are omitted, and
/// each value uses the narrowest width tag that holds it.
///
/// # Errors
///
/// [`Error::InvalidFormat`] or [`Error::UnsupportedValue`] for a tile that
/// fails [`TileSpec::validate`], with the cell index attached.
pub fn encode_map_with(grid: &MapGrid, options: &CodecOptions) -> Result<Vec<u8>> {
    let mut w = ByteWriter::with_capacity(2 + grid.tiles().len() * 2);
    w.write_u8(grid.width());
    w.write_u8(grid.height());
    for (index, tile) in grid.tiles().iter().enumerate() {
        write_tile(&mut w, tile, options.max_tile_depth).map_err(|e| e.at_tile(index))?;
    }
    Ok(w.into_bytes())
}

/// Read one cell. Layers are collected flat, then folded bottom-up.
fn read_tile(cursor: &mut Cursor<'_>, max_depth: usize) -> Result<TileSpec> {
    let mut layers = Vec::new();
    loop {
        if layers.len() >= max_depth {
            return Err(Error::InvalidFormat(format!(
                "tile stacks more than {max_depth} layers"
            )));
        }
        let layer = read_layer(cursor)?;
        let terminal = layer.tile.shape() == TileShape::Terminal;
        layers.push(layer);
        if terminal {
            break;
        }
    }

    layers
        .into_iter()
        .rev()
        .reduce(|lower, mut upper| {
            upper.lower = Some(Box::new(lower));
            upper
        })
        .ok_or_else(|| Error::InvalidFormat("tile has no layers".to_string()))
}

fn read_layer(cursor: &mut Cursor<'_>) -> Result<TileSpec> {
    let mut values = Vec::new();
    let tile = loop {
        match cursor.read_u8()? {
            MODIFIER_8BIT => values.push(cursor.read_u8()? as u32),
            MODIFIER_16BIT => values.push(cursor.read_u16_le()? as u32),
            MODIFIER_32BIT => values.push(cursor.read_u32_le()?),
            byte => break TileId(byte),
        }
    };

    let mut layer = TileSpec::new(tile);
    match tile.shape() {
        TileShape::DirectionAndLower => {
            layer.dir = Some(read_direction(cursor)?);
        },
        TileShape::Canopy => {
            let offset = cursor.position();
            let mask = cursor.read_u8()?;
            let walls = ThinWallCanopy::from_mask(mask).ok_or_else(|| {
                Error::InvalidFormat(format!("thin wall mask {mask:#04x} at offset {offset:#x}"))
            })?;
            layer.thin_wall_canopy = Some(walls);
        },
        TileShape::DirectionalBlock => {
            layer.dir = Some(read_direction(cursor)?);
            let offset = cursor.position();
            let mask = cursor.read_u8()?;
            let arrows = DirectionSet::from_bits(mask).ok_or_else(|| {
                Error::InvalidFormat(format!("arrow mask {mask:#04x} at offset {offset:#x}"))
            })?;
            layer.directional_arrows = Some(arrows);
        },
        TileShape::LowerOnly | TileShape::Terminal => {},
    }

    layer.modifiers = decode_modifiers(tile, &values)?;
    Ok(layer)
}

fn read_direction(cursor: &mut Cursor<'_>) -> Result<Direction> {
    let offset = cursor.position();
    let byte = cursor.read_u8()?;
    Direction::from_index(byte)
        .ok_or_else(|| Error::InvalidFormat(format!("direction byte {byte:#04x} at offset {offset:#x}")))
}

fn decode_modifiers(tile: TileId, values: &[u32]) -> Result<Vec<Modifier>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let Some(kind) = tile.modifier_rule() else {
        return Err(Error::UnsupportedValue(format!(
            "{tile} takes no modifiers but {} precede it",
            values.len()
        )));
    };

    let mut modifiers = Vec::with_capacity(values.len());
    for &value in values {
        let modifier = Modifier::decode(kind, value)?;
        if value != 0 {
            modifiers.push(modifier);
        }
    }
    Ok(modifiers)
}

fn write_tile(w: &mut ByteWriter, tile: &TileSpec, max_depth: usize) -> Result<()> {
    for (level, layer) in tile.layers().enumerate() {
        if level >= max_depth {
            return Err(Error::InvalidFormat(format!(
                "tile stacks more than {max_depth} layers"
            )));
        }
        layer.check_layer()?;
        write_layer(w, layer)?;
    }
    Ok(())
}

fn write_layer(w: &mut ByteWriter, layer: &TileSpec) -> Result<()> {
    let mut modifiers: Vec<&Modifier> = layer.modifiers.iter().collect();
    modifiers.sort_by_key(|m| m.kind());
    for value in modifiers.into_iter().map(Modifier::value).filter(|&v| v != 0) {
        write_modifier_value(w, value);
    }

    w.write_u8(layer.tile.byte());
    let missing_dir = || Error::InvalidFormat(format!("{} requires a direction", layer.tile));
    match layer.tile.shape() {
        TileShape::DirectionAndLower => {
            w.write_u8(layer.dir.ok_or_else(missing_dir)?.index());
        },
        TileShape::Canopy => {
            w.write_u8(layer.thin_wall_canopy.unwrap_or_default().mask());
        },
        TileShape::DirectionalBlock => {
            w.write_u8(layer.dir.ok_or_else(missing_dir)?.index());
            w.write_u8(layer.directional_arrows.unwrap_or_default().bits());
        },
        TileShape::LowerOnly | TileShape::Terminal => {},
    }
    Ok(())
}

fn write_modifier_value(w: &mut ByteWriter, value: u32) {
    if let Ok(byte) = u8::try_from(value) {
        w.write_u8(MODIFIER_8BIT);
        w.write_u8(byte);
    } else if let Ok(word) = u16::try_from(value) {
        w.write_u8(MODIFIER_16BIT);
        w.write_u16_le(word);
    } else {
        w.write_u8(MODIFIER_32BIT);
        w.write_u32_le(value);
    }
}
