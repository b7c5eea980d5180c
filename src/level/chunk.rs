//! Container chunks.
//!
//! A level file is a flat sequence of `tag: [u8; 4]`, `length: u32 LE`,
//! `payload` records closed by an empty `END ` chunk.

use crate::common::{Error, Result, blob};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Four-byte chunk tag.
///
/// Displayed and serialized as four characters, one per byte, with bytes
/// above 0x7F written as the Latin-1 character of the same value so that any
/// tag survives the structured form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const FILE_VERSION: ChunkTag = ChunkTag(*b"CC2M");
    pub const LOCK: ChunkTag = ChunkTag(*b"LOCK");
    pub const TITLE: ChunkTag = ChunkTag(*b"TITL");
    pub const AUTHOR: ChunkTag = ChunkTag(*b"AUTH");
    pub const EDITOR_VERSION: ChunkTag = ChunkTag(*b"VERS");
    pub const CLUE: ChunkTag = ChunkTag(*b"CLUE");
    pub const NOTE: ChunkTag = ChunkTag(*b"NOTE");
    pub const OPTIONS: ChunkTag = ChunkTag(*b"OPTN");
    pub const MAP: ChunkTag = ChunkTag(*b"MAP ");
    pub const PACKED_MAP: ChunkTag = ChunkTag(*b"PACK");
    pub const KEY: ChunkTag = ChunkTag(*b"KEY ");
    pub const REPLAY: ChunkTag = ChunkTag(*b"REPL");
    pub const PACKED_REPLAY: ChunkTag = ChunkTag(*b"PRPL");
    pub const READ_ONLY: ChunkTag = ChunkTag(*b"RDNY");
    pub const END: ChunkTag = ChunkTag(*b"END ");

    #[inline]
    pub fn bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|&b| write!(f, "{}", b as char))
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({:?})", self.to_string())
    }
}

impl FromStr for ChunkTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tag = [0u8; 4];
        let mut chars = s.chars();
        for slot in &mut tag {
            let ch = chars.next().ok_or_else(|| bad_tag(s))?;
            *slot = u8::try_from(ch).map_err(|_| bad_tag(s))?;
        }
        if chars.next().is_some() {
            return Err(bad_tag(s));
        }
        Ok(ChunkTag(tag))
    }
}

fn bad_tag(s: &str) -> Error {
    Error::InvalidFormat(format!(
        "chunk tag {s:?} must be exactly 4 characters in U+0000..U+00FF"
    ))
}

impl Serialize for ChunkTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChunkTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One raw chunk, as read from or written to the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub tag: ChunkTag,
    #[serde(with = "blob")]
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(tag: ChunkTag, data: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(ChunkTag::MAP.to_string(), "MAP ");
        assert_eq!(ChunkTag::PACKED_MAP.to_string(), "PACK");
        assert_eq!(format!("{:?}", ChunkTag::END), r#"ChunkTag("END ")"#);
    }

    #[test]
    fn test_any_tag_round_trips_through_text() {
        let odd = ChunkTag([0x00, 0x7F, 0x80, 0xFF]);
        let text = odd.to_string();
        assert_eq!(text.chars().count(), 4);
        assert_eq!(text.parse::<ChunkTag>().unwrap(), odd);
    }

    #[test]
    fn test_bad_tags() {
        assert!("ABC".parse::<ChunkTag>().is_err());
        assert!("ABCDE".parse::<ChunkTag>().is_err());
        assert!("AB\u{20AC}D".parse::<ChunkTag>().is_err());
    }

    #[test]
    fn test_chunk_serde() {
        let chunk = Chunk::new(ChunkTag::KEY, vec![1, 2, 3]);
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json, r#"{"tag":"KEY ","data":"AQID"}"#);
        assert_eq!(serde_json::from_str::<Chunk>(&json).unwrap(), chunk);
    }
}
