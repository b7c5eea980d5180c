//! Container encoding.
//!
//! Two paths, chosen by whether the document still carries the chunk list it
//! was decoded from:
//!
//! - **chunk list**: walk the original chunks in order. For the first chunk
//!   of each field, recompute the field's content and compare it with the
//!   stored payload (after unpacking, for `PACK`/`PRPL`). Equal content
//!   reuses the stored bytes untouched; different content is written fresh.
//!   Every other chunk is copied verbatim. Fields with no chunk in the list
//!   are appended in canonical order.
//! - **fresh**: every present field in canonical order, then
//!   [`LevelDocument::extra_chunks`].
//!
//! Both end with an empty `END ` chunk.

use super::chunk::{Chunk, ChunkTag};
use super::document::{Field, LevelDocument};
use crate::common::codepage::encode_text;
use crate::common::{ByteWriter, Error, Result};
use crate::config::CodecOptions;
use crate::map::encode_map_with;
use crate::pack::{pack, unpack};
use log::debug;
use std::borrow::Cow;
use std::collections::HashSet;

/// Encode a level file with default options.
pub fn encode_level(doc: &LevelDocument) -> Result<Vec<u8>> {
    encode_level_with(doc, &CodecOptions::default())
}

/// Encode a level file.
///
/// An unedited decoded document encodes to exactly the bytes it came from.
///
/// # Errors
///
/// - [`Error::UnencodableCharacter`] for text outside Windows-1252
/// - [`Error::InvalidFormat`] for options breaking the prefix rule or an
///   invalid map
/// - [`Error::SizeConstraintViolation`] for a payload too large to pack or to
///   describe in a u32 length
///
/// Errors carry the tag of the chunk being written.
pub fn encode_level_with(doc: &LevelDocument, options: &CodecOptions) -> Result<Vec<u8>> {
    let mut w = ByteWriter::new();
    match &doc.chunks {
        Some(chunks) => write_from_chunks(&mut w, doc, chunks, options)?,
        None => write_fresh(&mut w, doc, options)?,
    }
    write_chunk(&mut w, ChunkTag::END, &[])?;
    Ok(w.into_bytes())
}

fn write_from_chunks(
    w: &mut ByteWriter,
    doc: &LevelDocument,
    chunks: &[Chunk],
    options: &CodecOptions,
) -> Result<()> {
    let mut claimed = HashSet::new();

    for chunk in chunks {
        let tag = chunk.tag;
        let offset = w.len();
        let payload = match Field::for_tag(tag) {
            Some(field) if claimed.insert(field) => {
                let Some(fresh) = content(doc, field, options).map_err(|e| e.in_chunk(tag, offset))?
                else {
                    debug!("chunk '{tag}': field cleared, dropped");
                    continue;
                };
                reuse_or(chunk, fresh).map_err(|e| e.in_chunk(tag, offset))?
            },
            _ => Cow::Borrowed(chunk.data.as_slice()),
        };
        write_chunk(w, tag, &payload)?;
    }

    for field in Field::CANONICAL {
        if claimed.contains(&field) {
            continue;
        }
        write_field(w, doc, field, options)?;
    }
    Ok(())
}

fn write_fresh(w: &mut ByteWriter, doc: &LevelDocument, options: &CodecOptions) -> Result<()> {
    for field in Field::CANONICAL {
        write_field(w, doc, field, options)?;
    }
    for chunk in &doc.extra_chunks {
        write_chunk(w, chunk.tag, &chunk.data)?;
    }
    Ok(())
}

/// Write a field under its canonical tag, if present.
fn write_field(w: &mut ByteWriter, doc: &LevelDocument, field: Field, options: &CodecOptions) -> Result<()> {
    let tag = field.canonical_tag();
    let offset = w.len();
    let Some(fresh) = content(doc, field, options).map_err(|e| e.in_chunk(tag, offset))? else {
        return Ok(());
    };
    let payload = if is_packed(tag) {
        Cow::Owned(pack(&fresh).map_err(|e| e.in_chunk(tag, offset))?)
    } else {
        fresh
    };
    debug!("chunk '{tag}': {} bytes, appended", payload.len());
    write_chunk(w, tag, &payload)
}

/// Unpacked content of a field, or `None` if the field is absent.
fn content<'a>(doc: &'a LevelDocument, field: Field, options: &CodecOptions) -> Result<Option<Cow<'a, [u8]>>> {
    let bytes = match field {
        Field::Text(text) => match doc.text(text) {
            Some(value) => Cow::Owned(encode_text(value)?),
            None => return Ok(None),
        },
        Field::Options => match &doc.options {
            Some(opts) => Cow::Owned(opts.encode()?),
            None => return Ok(None),
        },
        Field::Map => match &doc.map {
            Some(grid) => Cow::Owned(encode_map_with(grid, options)?),
            None => return Ok(None),
        },
        Field::Key => match &doc.key {
            Some(key) => Cow::Borrowed(key.as_slice()),
            None => return Ok(None),
        },
        Field::Replay => match &doc.replay {
            Some(replay) => Cow::Borrowed(replay.as_slice()),
            None => return Ok(None),
        },
        Field::ReadOnly if doc.read_only => Cow::Borrowed(&[][..]),
        Field::ReadOnly => return Ok(None),
    };
    Ok(Some(bytes))
}

/// The stored payload if its content equals `fresh`, otherwise `fresh`
/// encoded for the chunk's tag.
fn reuse_or<'a>(chunk: &'a Chunk, fresh: Cow<'a, [u8]>) -> Result<Cow<'a, [u8]>> {
    let tag = chunk.tag;
    if is_packed(tag) {
        // A stored payload that no longer unpacks is simply replaced
        if let Ok(original) = unpack(&chunk.data)
            && original[..] == fresh[..]
        {
            debug!("chunk '{tag}': content unchanged, reused");
            return Ok(Cow::Borrowed(chunk.data.as_slice()));
        }
        debug!("chunk '{tag}': content changed, repacked");
        return Ok(Cow::Owned(pack(&fresh)?));
    }

    if chunk.data[..] == fresh[..] {
        debug!("chunk '{tag}': content unchanged, reused");
        Ok(Cow::Borrowed(chunk.data.as_slice()))
    } else {
        debug!("chunk '{tag}': content changed, rewritten");
        Ok(fresh)
    }
}

fn is_packed(tag: ChunkTag) -> bool {
    tag == ChunkTag::PACKED_MAP || tag == ChunkTag::PACKED_REPLAY
}

fn write_chunk(w: &mut ByteWriter, tag: ChunkTag, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        Error::SizeConstraintViolation(format!("chunk '{tag}' payload of {} bytes exceeds u32", payload.len()))
    })?;
    w.write_bytes(&tag.bytes());
    w.write_u32_le(len);
    w.write_bytes(payload);
    Ok(())
}
