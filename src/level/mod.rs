//! The level container: chunk framing, document fields, and the structured
//! text form.
//!
//! ```
//! use c2m::level::{decode_level, encode_level};
//!
//! let mut bytes = b"TITL".to_vec();
//! bytes.extend(5u32.to_le_bytes());
//! bytes.extend(b"Hello");
//! bytes.extend(b"END \0\0\0\0");
//!
//! let doc = decode_level(&bytes).unwrap();
//! assert_eq!(doc.title.as_deref(), Some("Hello"));
//! assert_eq!(encode_level(&doc).unwrap(), bytes);
//! ```

pub mod chunk;
pub mod document;
pub mod options;
pub mod reader;
pub mod structured;
pub mod writer;

pub use chunk::{Chunk, ChunkTag};
pub use document::{LevelDocument, TextField};
pub use options::{LevelOptions, REPLAY_HASH_LEN};
pub use reader::{decode_level, decode_level_with};
pub use structured::{SCHEMA, parse, parse_with, stringify};
pub use writer::{encode_level, encode_level_with};
