//! Unified error types for the c2m codec.
//!
//! Every codec layer reports failures through the single [`Error`] enum. Root
//! causes follow a small closed taxonomy ([`ErrorKind`]); positional context
//! (chunk tag, tile index) is layered on top by wrapper variants so that the
//! root category stays machine-checkable.
use crate::level::ChunkTag;
use thiserror::Error;

/// Main error type for c2m operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A read asked for more bytes than the buffer holds
    #[error("unexpected end of input at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEndOfInput {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// Malformed tag, length, mask or structurally required field
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A recognized byte or value falls outside every defined sub-range
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// A character has no Windows-1252 representation
    #[error("cannot encode character {ch:?} at position {position} in Windows-1252")]
    UnencodableCharacter { ch: char, position: usize },

    /// A payload exceeds a fixed-width capacity
    #[error("size constraint violated: {0}")]
    SizeConstraintViolation(String),

    /// Error raised while handling a specific container chunk
    #[error("chunk '{tag}' at offset {offset:#x}: {source}")]
    InChunk {
        tag: ChunkTag,
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    /// Error raised while handling a specific map cell
    #[error("tile {index}: {source}")]
    AtTile {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// JSON structured form could not be read or written, or does not match
    /// the document shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML structured form could not be read or written
    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Root category of an [`Error`], with positional wrappers stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedEndOfInput,
    InvalidFormat,
    UnsupportedValue,
    UnencodableCharacter,
    SizeConstraintViolation,
    /// Structured text is not valid JSON/YAML or does not have the document shape
    Syntax,
}

impl Error {
    /// Root category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnexpectedEndOfInput { .. } => ErrorKind::UnexpectedEndOfInput,
            Error::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Error::UnsupportedValue(_) => ErrorKind::UnsupportedValue,
            Error::UnencodableCharacter { .. } => ErrorKind::UnencodableCharacter,
            Error::SizeConstraintViolation(_) => ErrorKind::SizeConstraintViolation,
            Error::InChunk { source, .. } | Error::AtTile { source, .. } => source.kind(),
            Error::Json(_) | Error::Yaml(_) => ErrorKind::Syntax,
        }
    }

    /// Attach the chunk in which this error occurred.
    pub fn in_chunk(self, tag: ChunkTag, offset: usize) -> Self {
        Error::InChunk {
            tag,
            offset,
            source: Box::new(self),
        }
    }

    /// Attach the map cell (row-major index) at which this error occurred.
    pub fn at_tile(self, index: usize) -> Self {
        Error::AtTile {
            index,
            source: Box::new(self),
        }
    }
}

/// Result type for c2m operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sees_through_wrappers() {
        let err = Error::UnsupportedValue("logic 0x18".to_string())
            .at_tile(7)
            .in_chunk(ChunkTag::PACKED_MAP, 0x40);
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);

        let msg = err.to_string();
        assert!(msg.contains("PACK"), "{msg}");
        assert!(msg.contains("tile 7"), "{msg}");
    }

    #[test]
    fn test_unencodable_display() {
        let err = Error::UnencodableCharacter {
            ch: '\u{3042}',
            position: 3,
        };
        assert_eq!(err.kind(), ErrorKind::UnencodableCharacter);
        assert!(err.to_string().contains("position 3"));
    }
}
