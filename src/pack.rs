//! Run/backreference compression used by packed map and replay chunks.
//!
//! A packed stream starts with a u16 little-endian count of output bytes,
//! followed by operations until that many bytes have been produced:
//!
//! - control byte `n <= 0x7F`: copy the next `n` bytes verbatim
//! - control byte `n > 0x7F`: copy `n - 0x80` bytes from `offset` bytes back,
//!   where `offset` is the following byte. Byte `i` of the copy comes from
//!   `pos - offset + (i % offset)`, so a short window expands into a run.
//!
//! The packer only ever emits literal runs. Its output is always valid and
//! deterministic but makes no attempt at compression.

use crate::common::{ByteWriter, Cursor, Error, Result};

/// Largest literal run a single control byte can announce.
pub const MAX_LITERAL_RUN: usize = 0x7F;

/// Largest payload the u16 length header can describe.
pub const MAX_UNPACKED_LEN: usize = u16::MAX as usize;

/// Decompress a packed stream.
///
/// # Errors
///
/// - [`Error::UnexpectedEndOfInput`] if the stream ends mid-operation
/// - [`Error::InvalidFormat`] for a zero offset, an offset reaching before the
///   start of the output, or any operation overrunning the declared length
///
/// # Examples
///
/// ```
/// use c2m::pack::unpack;
///
/// // header 2, literal "A", then copy 1 byte from 1 back
/// let out = unpack(&[0x02, 0x00, 0x01, b'A', 0x81, 0x01]).unwrap();
/// assert_eq!(out, b"AA");
/// ```
pub fn unpack(packed: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(packed);
    let out_len = cursor.read_u16_le()? as usize;
    let mut out = Vec::with_capacity(out_len);

    while out.len() < out_len {
        let op_offset = cursor.position();
        let control = cursor.read_u8()?;
        let pos = out.len();

        if control <= 0x7F {
            let literal = cursor.read_bytes(control as usize)?;
            if pos + literal.len() > out_len {
                return Err(Error::InvalidFormat(format!(
                    "literal run at offset {op_offset:#x} overruns output: {pos} + {} > {out_len}",
                    literal.len()
                )));
            }
            out.extend_from_slice(literal);
            continue;
        }

        let count = (control - 0x80) as usize;
        let offset = cursor.read_u8()? as usize;
        if offset == 0 {
            return Err(Error::InvalidFormat(format!(
                "backreference at offset {op_offset:#x} has offset 0"
            )));
        }
        if offset > pos {
            return Err(Error::InvalidFormat(format!(
                "backreference at offset {op_offset:#x} reaches before output start: offset {offset}, position {pos}"
            )));
        }
        if pos + count > out_len {
            return Err(Error::InvalidFormat(format!(
                "backreference at offset {op_offset:#x} overruns output: {pos} + {count} > {out_len}"
            )));
        }

        let start = pos - offset;
        for i in 0..count {
            let byte = out[start + (i % offset)];
            out.push(byte);
        }
    }

    Ok(out)
}

/// Compress `data` using literal runs only.
///
/// # Errors
///
/// Returns [`Error::SizeConstraintViolation`] if `data` is longer than
/// [`MAX_UNPACKED_LEN`].
///
/// # Examples
///
/// ```
/// use c2m::pack::{pack, unpack};
///
/// let data = vec![7u8; 200];
/// let packed = pack(&data).unwrap();
/// assert_eq!(&packed[..3], &[200, 0, 127]);
/// assert_eq!(unpack(&packed).unwrap(), data);
/// ```
pub fn pack(data: &[u8]) -> Result<Vec<u8>> {
    let len = u16::try_from(data.len()).map_err(|_| {
        Error::SizeConstraintViolation(format!(
            "unpacked payload of {} bytes exceeds the {MAX_UNPACKED_LEN}-byte pack header limit",
            data.len()
        ))
    })?;

    let runs = data.len().div_ceil(MAX_LITERAL_RUN);
    let mut w = ByteWriter::with_capacity(2 + runs + data.len());
    w.write_u16_le(len);
    for run in data.chunks(MAX_LITERAL_RUN) {
        // chunks() bounds every run by MAX_LITERAL_RUN, which fits a control byte
        w.write_u8(run.len() as u8);
        w.write_bytes(run);
    }
    Ok(w.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_single_step_backreference() {
        assert_eq!(unpack(&[0x02, 0x00, 0x01, 0x5A, 0x81, 0x01]).unwrap(), vec![0x5A, 0x5A]);
    }

    #[test]
    fn test_window_repeats_into_long_run() {
        // "AB" then copy 7 bytes from 2 back: ABABABABA
        let packed = [0x09, 0x00, 0x02, b'A', b'B', 0x87, 0x02];
        assert_eq!(unpack(&packed).unwrap(), b"ABABABABA");
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(unpack(&[0x00, 0x00]).unwrap(), Vec::<u8>::new());
        assert_eq!(pack(&[]).unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_invalid_backreferences() {
        let zero_offset = [0x02, 0x00, 0x01, 0x00, 0x81, 0x00];
        assert_eq!(unpack(&zero_offset).unwrap_err().kind(), ErrorKind::InvalidFormat);

        let before_start = [0x03, 0x00, 0x01, 0x00, 0x82, 0x02];
        assert_eq!(unpack(&before_start).unwrap_err().kind(), ErrorKind::InvalidFormat);

        let overrun = [0x02, 0x00, 0x01, 0x00, 0x85, 0x01];
        assert_eq!(unpack(&overrun).unwrap_err().kind(), ErrorKind::InvalidFormat);

        let literal_overrun = [0x01, 0x00, 0x02, 0x00, 0x00];
        assert_eq!(unpack(&literal_overrun).unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_truncated_stream() {
        assert_eq!(unpack(&[0x05]).unwrap_err().kind(), ErrorKind::UnexpectedEndOfInput);
        assert_eq!(
            unpack(&[0x05, 0x00, 0x05, 0x01]).unwrap_err().kind(),
            ErrorKind::UnexpectedEndOfInput
        );
        assert_eq!(unpack(&[0x02, 0x00, 0x01, 0x00, 0x81]).unwrap_err().kind(), ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_literal_only_layout() {
        let data: Vec<u8> = (0..200u32).map(|i| (i * 7) as u8).collect();
        let packed = pack(&data).unwrap();

        assert_eq!(&packed[..2], &[200, 0]);
        assert_eq!(packed[2], 127);
        assert_eq!(&packed[3..130], &data[..127]);
        assert_eq!(packed[130], 73);
        assert_eq!(&packed[131..], &data[127..]);
        assert_eq!(packed.len(), 2 + 1 + 127 + 1 + 73);
    }

    #[test]
    fn test_oversized_input() {
        let data = vec![0u8; MAX_UNPACKED_LEN + 1];
        assert_eq!(pack(&data).unwrap_err().kind(), ErrorKind::SizeConstraintViolation);
        assert!(pack(&data[..MAX_UNPACKED_LEN]).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_pack_unpack_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let packed = pack(&data).unwrap();
            prop_assert_eq!(unpack(&packed).unwrap(), data);
        }
    }
}
