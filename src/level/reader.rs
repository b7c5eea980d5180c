//! Container decoding.

use super::chunk::{Chunk, ChunkTag};
use super::document::{Field, LevelDocument};
use super::options::LevelOptions;
use crate::common::codepage::decode_text;
use crate::common::{Cursor, Error, Result};
use crate::config::CodecOptions;
use crate::map::decode_map_with;
use crate::pack::unpack;
use log::{debug, warn};
use std::borrow::Cow;
use std::collections::HashSet;

/// Decode a level file with default options.
pub fn decode_level(bytes: &[u8]) -> Result<LevelDocument> {
    decode_level_with(bytes, &CodecOptions::default())
}

/// Decode a level file.
///
/// Chunks are read until `END `. The first chunk of each recognized field is
/// interpreted; later repeats and unknown tags are kept uninterpreted in
/// [`LevelDocument::extra_chunks`]. Every chunk, interpreted or not, is
/// recorded in [`LevelDocument::chunks`].
///
/// # Errors
///
/// - [`Error::UnexpectedEndOfInput`] if a chunk header or payload is cut
///   short, or the input ends before `END `
/// - [`Error::InvalidFormat`] for a non-empty `END ` or `RDNY`, or bytes
///   after `END ` when [`CodecOptions::reject_trailing_bytes`] is set
/// - any error from the text, options, pack or map codecs
///
/// Errors inside a chunk carry its tag and offset.
pub fn decode_level_with(bytes: &[u8], options: &CodecOptions) -> Result<LevelDocument> {
    let mut cursor = Cursor::new(bytes);
    let mut doc = LevelDocument::default();
    let mut chunks = Vec::new();
    let mut seen = HashSet::new();

    loop {
        let offset = cursor.position();
        let tag = ChunkTag(cursor.read_array::<4>()?);
        let len = cursor.read_u32_le().map_err(|e| e.in_chunk(tag, offset))?;

        if tag == ChunkTag::END {
            if len != 0 {
                return Err(Error::InvalidFormat(format!("END chunk must be empty, got length {len}"))
                    .in_chunk(tag, offset));
            }
            break;
        }

        let payload = cursor
            .read_bytes(len as usize)
            .map_err(|e| e.in_chunk(tag, offset))?;
        if tag == ChunkTag::READ_ONLY && !payload.is_empty() {
            return Err(Error::InvalidFormat(format!("RDNY chunk must be empty, got length {len}"))
                .in_chunk(tag, offset));
        }
        chunks.push(Chunk::new(tag, payload));

        match Field::for_tag(tag) {
            Some(field) if seen.insert(field) => {
                debug!("chunk '{tag}' at {offset:#x}: {len} bytes");
                read_field(&mut doc, field, tag, payload, options).map_err(|e| e.in_chunk(tag, offset))?;
            },
            Some(_) => {
                debug!("chunk '{tag}' at {offset:#x}: repeated, kept as extra");
                doc.extra_chunks.push(Chunk::new(tag, payload));
            },
            None => {
                debug!("chunk '{tag}' at {offset:#x}: unrecognized, kept as extra");
                doc.extra_chunks.push(Chunk::new(tag, payload));
            },
        }
    }

    if !cursor.is_empty() {
        let trailing = cursor.remaining();
        if options.reject_trailing_bytes {
            return Err(Error::InvalidFormat(format!(
                "{trailing} bytes after END chunk at offset {:#x}",
                cursor.position()
            )));
        }
        warn!("ignoring {trailing} bytes after END chunk");
    }

    doc.chunks = Some(chunks);
    Ok(doc)
}

fn read_field(
    doc: &mut LevelDocument,
    field: Field,
    tag: ChunkTag,
    payload: &[u8],
    options: &CodecOptions,
) -> Result<()> {
    match field {
        Field::Text(text) => *doc.text_mut(text) = Some(decode_text(payload)),
        Field::Options => doc.options = Some(LevelOptions::decode(payload)?),
        Field::Map => {
            let raw = unpacked(tag, ChunkTag::PACKED_MAP, payload)?;
            doc.map = Some(decode_map_with(&raw, options)?);
        },
        Field::Key => doc.key = Some(payload.to_vec()),
        Field::Replay => {
            doc.replay = Some(unpacked(tag, ChunkTag::PACKED_REPLAY, payload)?.into_owned());
        },
        Field::ReadOnly => doc.read_only = true,
    }
    Ok(())
}

fn unpacked<'a>(tag: ChunkTag, packed_tag: ChunkTag, payload: &'a [u8]) -> Result<Cow<'a, [u8]>> {
    if tag == packed_tag {
        Ok(Cow::Owned(unpack(payload)?))
    } else {
        warn!("unpacked '{tag}' chunk; editors normally write '{packed_tag}'");
        Ok(Cow::Borrowed(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use crate::map::TileId;

    fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.extend((payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn end() -> Vec<u8> {
        chunk(b"END ", &[])
    }

    #[test]
    fn test_minimal_file() {
        let doc = decode_level(&end()).unwrap();
        assert_eq!(doc.chunks, Some(Vec::new()));
        assert_eq!(doc.title, None);
    }

    #[test]
    fn test_fields_and_extras() {
        let mut bytes = chunk(b"CC2M", b"7");
        bytes.extend(chunk(b"TITL", b"Level\0"));
        bytes.extend(chunk(b"MAP ", &[1, 1, 0x02]));
        bytes.extend(chunk(b"XTRA", &[9, 9]));
        bytes.extend(chunk(b"TITL", b"Again"));
        bytes.extend(chunk(b"RDNY", &[]));
        bytes.extend(end());

        let doc = decode_level(&bytes).unwrap();
        assert_eq!(doc.file_version.as_deref(), Some("7"));
        assert_eq!(doc.title.as_deref(), Some("Level\0"));
        assert!(doc.read_only);
        assert_eq!(doc.map.as_ref().unwrap().tiles()[0].tile, TileId::WALL);
        assert_eq!(
            doc.extra_chunks,
            vec![
                Chunk::new(ChunkTag(*b"XTRA"), vec![9, 9]),
                Chunk::new(ChunkTag::TITLE, b"Again".to_vec()),
            ]
        );
        assert_eq!(doc.chunks.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn test_packed_replay() {
        let mut bytes = chunk(b"PRPL", &[3, 0, 0x01, 0xAB, 0x82, 0x01]);
        bytes.extend(end());
        let doc = decode_level(&bytes).unwrap();
        assert_eq!(doc.replay, Some(vec![0xAB, 0xAB, 0xAB]));
    }

    #[test]
    fn test_missing_end() {
        let bytes = chunk(b"TITL", b"x");
        let err = decode_level(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_truncated_payload_names_chunk() {
        let mut bytes = b"NOTE".to_vec();
        bytes.extend(10u32.to_le_bytes());
        bytes.extend(b"short");
        let err = decode_level(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);
        assert!(err.to_string().contains("NOTE"), "{err}");
    }

    #[test]
    fn test_non_empty_markers() {
        let mut bytes = b"END ".to_vec();
        bytes.extend(1u32.to_le_bytes());
        bytes.push(0);
        assert_eq!(decode_level(&bytes).unwrap_err().kind(), ErrorKind::InvalidFormat);

        let mut bytes = chunk(b"RDNY", &[1]);
        bytes.extend(end());
        assert_eq!(decode_level(&bytes).unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = end();
        bytes.push(0xEE);
        assert_eq!(decode_level(&bytes).unwrap_err().kind(), ErrorKind::InvalidFormat);

        let lenient = CodecOptions::new().with_reject_trailing_bytes(false);
        assert!(decode_level_with(&bytes, &lenient).is_ok());
    }

    #[test]
    fn test_map_error_carries_chunk_context() {
        // Direction byte out of range
        let mut bytes = chunk(b"MAP ", &[1, 1, 0x16, 0x09]);
        bytes.extend(end());
        let err = decode_level(&bytes).unwrap_err();
        assert!(matches!(err, Error::InChunk { tag: ChunkTag::MAP, .. }), "{err:?}");
    }
}
