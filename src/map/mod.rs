//! Map payloads: the tile catalog, the semantic tile tree and its byte
//! grammar.
//!
//! ```
//! use c2m::map::{decode_map, encode_map, TileId};
//!
//! let bytes = [2, 1, 0x0A, 0x02];
//! let grid = decode_map(&bytes).unwrap();
//! assert_eq!(grid.tiles()[0].tile, TileId::FORCE_N);
//! assert_eq!(encode_map(&grid).unwrap(), bytes);
//! ```

pub mod catalog;
pub mod codec;
pub mod direction;
pub mod grid;
pub mod modifier;
pub mod tile;

pub use catalog::{TileId, TileShape};
pub use codec::{decode_map, decode_map_with, encode_map, encode_map_with};
pub use direction::{Corner, Direction, DirectionSet};
pub use grid::MapGrid;
pub use modifier::{CustomStyle, LetterSymbol, LogicGate, Modifier, ModifierKind, TrackActive, TrackPieces};
pub use tile::{ThinWallCanopy, TileSpec};
