//! c2m - A lossless codec for Chip's Challenge 2 level files
//!
//! This library decodes `.c2m` level files into a semantic document, writes
//! them back byte for byte, and converts them to and from a structured JSON
//! or YAML form.
//!
//! # Features
//!
//! - **Container codec**: Chunked tag/length/payload stream with exact
//!   re-emission of every unedited chunk
//! - **Pack codec**: The literal/backreference compression used by packed
//!   map and replay chunks
//! - **Tile codec**: The nested tile byte grammar with typed modifiers
//!   (wires, tracks, logic gates, letters, clone arrows, custom styles)
//! - **Transforms**: Rotations and flips that re-point every direction in
//!   the tile tree
//! - **Structured form**: JSON and YAML through serde
//!
//! # Example - Round trip
//!
//! ```
//! use c2m::{decode_level, encode_level};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bytes = b"MAP ".to_vec();
//! bytes.extend(4u32.to_le_bytes());
//! bytes.extend([2, 1, 0x01, 0x02]); // 2x1: FLOOR, WALL
//! bytes.extend(b"END \0\0\0\0");
//!
//! let doc = decode_level(&bytes)?;
//! assert_eq!(doc.map.as_ref().map(|m| m.width()), Some(2));
//! assert_eq!(encode_level(&doc)?, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rotating a level
//!
//! ```
//! use c2m::{LevelDocument, MapGrid, TileSpec, Transform};
//! use c2m::map::TileId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = MapGrid::new(2, 1, vec![TileSpec::new(TileId::FORCE_N), TileSpec::new(TileId::WALL)])?;
//! let doc = LevelDocument { map: Some(map), ..Default::default() };
//!
//! let turned = doc.transformed("rot90".parse::<Transform>()?);
//! let map = turned.map.as_ref().unwrap();
//! assert_eq!((map.width(), map.height()), (1, 2));
//! assert_eq!(map.tiles()[0].tile, TileId::FORCE_E);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Structured form
//!
//! ```
//! use c2m::{LevelDocument, TextFormat, parse, stringify};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = LevelDocument { title: Some("Hi".into()), ..Default::default() };
//! let json = stringify(&doc, TextFormat::Json)?;
//! assert_eq!(parse(&json, TextFormat::Json)?, doc);
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: errors, byte cursor, text code page, blob serde
pub mod common;

/// Codec options and structured text formats
pub mod config;

/// The chunked level container and its structured form
pub mod level;

/// Map payloads and the tile grammar
pub mod map;

/// Run/backreference compression
pub mod pack;

/// Grid symmetries
pub mod transform;

pub use common::{Error, ErrorKind, Result};
pub use config::{CodecOptions, TextFormat};
pub use level::{
    Chunk, ChunkTag, LevelDocument, LevelOptions, decode_level, decode_level_with, encode_level, encode_level_with,
    parse, parse_with, stringify,
};
pub use map::{MapGrid, TileSpec};
pub use transform::Transform;
