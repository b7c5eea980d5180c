//! The decoded level.

use super::chunk::{Chunk, ChunkTag};
use super::options::LevelOptions;
use crate::common::{Result, blob};
use crate::config::{CodecOptions, TextFormat};
use crate::map::MapGrid;
use crate::transform::Transform;
use serde::{Deserialize, Serialize};

/// A level file as semantic fields plus the raw chunks it was read from.
///
/// `chunks` is the exact chunk sequence seen on decode (without the
/// terminator). While it is present the encoder walks it in order and reuses
/// each original payload whose content is unchanged, which makes an unedited
/// round trip byte-exact. A document built from scratch leaves it `None` and
/// is written in canonical order.
///
/// `extra_chunks` collects every chunk decode did not interpret: unknown
/// tags and repeats of a recognized tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LevelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LevelOptions>,
    /// Presence of the empty `RDNY` marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapGrid>,
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<u8>>,
    /// Unpacked replay bytes
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub replay: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Chunk>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_chunks: Vec<Chunk>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The seven text chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FileVersion,
    Lock,
    Title,
    Author,
    EditorVersion,
    Clue,
    Note,
}

impl TextField {
    pub const ALL: [TextField; 7] = [
        TextField::FileVersion,
        TextField::Lock,
        TextField::Title,
        TextField::Author,
        TextField::EditorVersion,
        TextField::Clue,
        TextField::Note,
    ];

    pub fn tag(self) -> ChunkTag {
        match self {
            TextField::FileVersion => ChunkTag::FILE_VERSION,
            TextField::Lock => ChunkTag::LOCK,
            TextField::Title => ChunkTag::TITLE,
            TextField::Author => ChunkTag::AUTHOR,
            TextField::EditorVersion => ChunkTag::EDITOR_VERSION,
            TextField::Clue => ChunkTag::CLUE,
            TextField::Note => ChunkTag::NOTE,
        }
    }
}

/// A document field backed by one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Text(TextField),
    Options,
    Map,
    Key,
    Replay,
    ReadOnly,
}

impl Field {
    /// Order of a freshly written file.
    pub(crate) const CANONICAL: [Field; 12] = [
        Field::Text(TextField::FileVersion),
        Field::Text(TextField::Lock),
        Field::Text(TextField::Title),
        Field::Text(TextField::Author),
        Field::Text(TextField::EditorVersion),
        Field::Text(TextField::Clue),
        Field::Text(TextField::Note),
        Field::Options,
        Field::Map,
        Field::Key,
        Field::Replay,
        Field::ReadOnly,
    ];

    /// The field a tag carries. Packed and unpacked variants share a field.
    pub(crate) fn for_tag(tag: ChunkTag) -> Option<Field> {
        let field = match tag {
            ChunkTag::OPTIONS => Field::Options,
            ChunkTag::MAP | ChunkTag::PACKED_MAP => Field::Map,
            ChunkTag::KEY => Field::Key,
            ChunkTag::REPLAY | ChunkTag::PACKED_REPLAY => Field::Replay,
            ChunkTag::READ_ONLY => Field::ReadOnly,
            other => return TextField::ALL.into_iter().find(|t| t.tag() == other).map(Field::Text),
        };
        Some(field)
    }

    /// Tag used when the field is written without an original chunk.
    pub(crate) fn canonical_tag(self) -> ChunkTag {
        match self {
            Field::Text(text) => text.tag(),
            Field::Options => ChunkTag::OPTIONS,
            Field::Map => ChunkTag::PACKED_MAP,
            Field::Key => ChunkTag::KEY,
            Field::Replay => ChunkTag::PACKED_REPLAY,
            Field::ReadOnly => ChunkTag::READ_ONLY,
        }
    }
}

impl LevelDocument {
    /// Decode a level file with default options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        super::reader::decode_level(bytes)
    }

    /// Encode to level file bytes with default options.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        super::writer::encode_level(self)
    }

    /// Parse the structured text form.
    pub fn from_text(text: &str, format: TextFormat) -> Result<Self> {
        super::structured::parse_with(text, format, &CodecOptions::default())
    }

    /// Render the structured text form.
    pub fn to_text(&self, format: TextFormat) -> Result<String> {
        super::structured::stringify(self, format)
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::FileVersion => self.file_version.as_deref(),
            TextField::Lock => self.lock.as_deref(),
            TextField::Title => self.title.as_deref(),
            TextField::Author => self.author.as_deref(),
            TextField::EditorVersion => self.editor_version.as_deref(),
            TextField::Clue => self.clue.as_deref(),
            TextField::Note => self.note.as_deref(),
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut Option<String> {
        match field {
            TextField::FileVersion => &mut self.file_version,
            TextField::Lock => &mut self.lock,
            TextField::Title => &mut self.title,
            TextField::Author => &mut self.author,
            TextField::EditorVersion => &mut self.editor_version,
            TextField::Clue => &mut self.clue,
            TextField::Note => &mut self.note,
        }
    }

    pub(crate) fn has(&self, field: Field) -> bool {
        match field {
            Field::Text(text) => self.text(text).is_some(),
            Field::Options => self.options.is_some(),
            Field::Map => self.map.is_some(),
            Field::Key => self.key.is_some(),
            Field::Replay => self.replay.is_some(),
            Field::ReadOnly => self.read_only,
        }
    }

    /// This document with its map transformed. Every other field, the chunk
    /// list included, is carried over unchanged.
    pub fn transformed(&self, transform: Transform) -> LevelDocument {
        LevelDocument {
            map: self.map.as_ref().map(|grid| transform.apply(grid)),
            ..self.clone()
        }
    }

    /// Forget the original chunks so the next encode writes canonical order.
    pub fn detach_chunks(&mut self) {
        self.chunks = None;
    }
}
