//! Windows-1252 text codec for level text chunks.
//!
//! Bytes 0x00-0x7F and 0xA0-0xFF map to the identical Unicode code points.
//! Bytes 0x80-0x9F go through the Windows-1252 substitution table; the five
//! unassigned slots (0x81, 0x8D, 0x8F, 0x90, 0x9D) decode to the C1 control
//! code point of the same value, so every byte sequence decodes and every
//! decoded string encodes back to the same bytes.
//!
//! Unlike the generic codepage helpers used for Office formats, this codec
//! keeps NUL bytes: level text chunks are re-emitted byte for byte.

use super::error::{Error, Result};
use encoding_rs::{EncoderResult, WINDOWS_1252};

/// Decode Windows-1252 bytes into a string.
///
/// Decoding is total; no byte sequence is rejected.
///
/// # Examples
///
/// ```
/// use c2m::common::codepage::decode_text;
///
/// assert_eq!(decode_text(b"Chip\x80"), "Chip\u{20AC}");
/// assert_eq!(decode_text(&[0x81]), "\u{81}");
/// ```
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encode a string as Windows-1252 bytes.
///
/// # Errors
///
/// Returns [`Error::UnencodableCharacter`] for the first character that has
/// no single-byte representation. `position` counts characters, not bytes.
///
/// # Examples
///
/// ```
/// use c2m::common::codepage::encode_text;
///
/// assert_eq!(encode_text("\u{20AC}").unwrap(), vec![0x80]);
/// assert!(encode_text("\u{3042}").is_err());
/// ```
pub fn encode_text(text: &str) -> Result<Vec<u8>> {
    let mut encoder = WINDOWS_1252.new_encoder();
    // Single-byte output never exceeds the UTF-8 input length
    let mut buf = vec![0u8; text.len()];
    let (result, read, written) = encoder.encode_from_utf8_without_replacement(text, &mut buf, true);

    match result {
        EncoderResult::InputEmpty => {
            buf.truncate(written);
            Ok(buf)
        },
        EncoderResult::Unmappable(ch) => {
            let position = text[..read].chars().count().saturating_sub(1);
            Err(Error::UnencodableCharacter { ch, position })
        },
        EncoderResult::OutputFull => Err(Error::SizeConstraintViolation(format!(
            "Windows-1252 output for {} input bytes overflowed its buffer",
            text.len()
        ))),
    }
}
