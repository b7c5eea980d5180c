//! The `OPTN` prefix record.
//!
//! Nine fixed-width fields in fixed order, any trailing run of which may be
//! absent, followed by an opaque tail:
//!
//! | field             | width |
//! |-------------------|-------|
//! | time              | 2     |
//! | editor window     | 1     |
//! | verified replay   | 1     |
//! | hide map          | 1     |
//! | read-only option  | 1     |
//! | replay hash       | 16    |
//! | hide logic        | 1     |
//! | CC1 boots         | 1     |
//! | blob patterns     | 1     |

use crate::common::{ByteWriter, Cursor, Error, Result, blob};
use serde::{Deserialize, Serialize};

/// Length of the replay hash field.
pub const REPLAY_HASH_LEN: usize = 16;

const FIELD_NAMES: [&str; 9] = [
    "time",
    "editorWindow",
    "verifiedReplay",
    "hideMap",
    "readOnlyOption",
    "replayHash",
    "hideLogic",
    "cc1Boots",
    "blobPatterns",
];

const FIELD_WIDTHS: [usize; 9] = [2, 1, 1, 1, 1, REPLAY_HASH_LEN, 1, 1, 1];

/// Level options. A field may only be present if every earlier field is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LevelOptions {
    /// Time limit in seconds, 0 for none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_window: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_replay: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_map: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_option: Option<u8>,
    /// Exactly [`REPLAY_HASH_LEN`] bytes when present
    #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
    pub replay_hash: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_logic: Option<u8>,
    /// Emulate the first game's boot behaviour
    #[serde(rename = "cc1Boots", default, skip_serializing_if = "Option::is_none")]
    pub legacy_boots: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_patterns: Option<u8>,
    /// Bytes following the last decoded field
    #[serde(default, with = "blob", skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<u8>,
}

impl LevelOptions {
    /// Decode an `OPTN` payload.
    ///
    /// Fields are read while enough bytes remain for the next one; whatever
    /// is left, including a partial field, becomes [`extra`](Self::extra).
    /// Decoding therefore never fails on a well-delimited payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);
        let mut options = LevelOptions::default();

        'fields: {
            if cursor.remaining() < 2 {
                break 'fields;
            }
            options.time = Some(cursor.read_u16_le()?);

            for slot in [
                &mut options.editor_window,
                &mut options.verified_replay,
                &mut options.hide_map,
                &mut options.read_only_option,
            ] {
                if cursor.is_empty() {
                    break 'fields;
                }
                *slot = Some(cursor.read_u8()?);
            }

            if cursor.remaining() < REPLAY_HASH_LEN {
                break 'fields;
            }
            options.replay_hash = Some(cursor.read_bytes(REPLAY_HASH_LEN)?.to_vec());

            for slot in [
                &mut options.hide_logic,
                &mut options.legacy_boots,
                &mut options.blob_patterns,
            ] {
                if cursor.is_empty() {
                    break 'fields;
                }
                *slot = Some(cursor.read_u8()?);
            }
        }

        options.extra = cursor.read_rest().to_vec();
        Ok(options)
    }

    /// Encode as an `OPTN` payload.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] if [`validate`](Self::validate) fails. Missing
    /// earlier fields are never zero-filled.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut w = ByteWriter::with_capacity(24 + self.extra.len());
        if let Some(time) = self.time {
            w.write_u16_le(time);
        }
        for byte in [self.editor_window, self.verified_replay, self.hide_map, self.read_only_option]
            .into_iter()
            .flatten()
        {
            w.write_u8(byte);
        }
        if let Some(hash) = &self.replay_hash {
            w.write_bytes(hash);
        }
        for byte in [self.hide_logic, self.legacy_boots, self.blob_patterns]
            .into_iter()
            .flatten()
        {
            w.write_u8(byte);
        }
        w.write_bytes(&self.extra);
        Ok(w.into_bytes())
    }

    /// Number of leading fields present.
    pub fn field_count(&self) -> usize {
        self.present().iter().take_while(|&&p| p).count()
    }

    /// Check the prefix rule, the hash length, and that the tail could not be
    /// mistaken for the next field on a later decode.
    pub fn validate(&self) -> Result<()> {
        let present = self.present();
        let count = self.field_count();

        if let Some(gap) = present[count..].iter().position(|&p| p) {
            return Err(Error::InvalidFormat(format!(
                "options field {} is set but {} is not",
                FIELD_NAMES[count + gap],
                FIELD_NAMES[count]
            )));
        }

        if let Some(hash) = &self.replay_hash
            && hash.len() != REPLAY_HASH_LEN
        {
            return Err(Error::InvalidFormat(format!(
                "options replayHash must be {REPLAY_HASH_LEN} bytes, got {}",
                hash.len()
            )));
        }

        if let Some(&width) = FIELD_WIDTHS.get(count)
            && self.extra.len() >= width
        {
            return Err(Error::InvalidFormat(format!(
                "options tail of {} bytes would decode as field {}",
                self.extra.len(),
                FIELD_NAMES[count]
            )));
        }
        Ok(())
    }

    fn present(&self) -> [bool; 9] {
        [
            self.time.is_some(),
            self.editor_window.is_some(),
            self.verified_replay.is_some(),
            self.hide_map.is_some(),
            self.read_only_option.is_some(),
            self.replay_hash.is_some(),
            self.hide_logic.is_some(),
            self.legacy_boots.is_some(),
            self.blob_patterns.is_some(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;

    fn full_payload() -> Vec<u8> {
        let mut payload = vec![0x2C, 0x01, 1, 0, 0, 1];
        payload.extend(0x10..0x20u8);
        payload.extend([1, 0, 2, 0xAA, 0xBB]);
        payload
    }

    #[test]
    fn test_full_record_with_tail() {
        let payload = full_payload();
        let options = LevelOptions::decode(&payload).unwrap();
        assert_eq!(options.time, Some(300));
        assert_eq!(options.editor_window, Some(1));
        assert_eq!(options.read_only_option, Some(1));
        assert_eq!(options.replay_hash.as_deref(), Some(&(0x10..0x20u8).collect::<Vec<_>>()[..]));
        assert_eq!(options.blob_patterns, Some(2));
        assert_eq!(options.extra, vec![0xAA, 0xBB]);
        assert_eq!(options.field_count(), 9);
        assert_eq!(options.encode().unwrap(), payload);
    }

    #[test]
    fn test_short_records() {
        let options = LevelOptions::decode(&[0x64, 0x00, 0x01]).unwrap();
        assert_eq!(options.time, Some(100));
        assert_eq!(options.editor_window, Some(1));
        assert_eq!(options.verified_replay, None);
        assert_eq!(options.encode().unwrap(), vec![0x64, 0x00, 0x01]);

        assert_eq!(LevelOptions::decode(&[]).unwrap(), LevelOptions::default());
    }

    #[test]
    fn test_partial_field_becomes_tail() {
        // A lone byte cannot hold the u16 time
        let options = LevelOptions::decode(&[0x07]).unwrap();
        assert_eq!(options.field_count(), 0);
        assert_eq!(options.extra, vec![0x07]);
        assert_eq!(options.encode().unwrap(), vec![0x07]);

        // Five fields, then 10 of the 16 hash bytes
        let payload = [0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let options = LevelOptions::decode(&payload).unwrap();
        assert_eq!(options.field_count(), 5);
        assert_eq!(options.extra.len(), 10);
        assert_eq!(options.encode().unwrap(), payload);
    }

    #[test]
    fn test_prefix_rule_enforced() {
        let gap = LevelOptions {
            time: Some(10),
            hide_map: Some(1),
            ..Default::default()
        };
        let err = gap.encode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.to_string().contains("hideMap"), "{err}");
    }

    #[test]
    fn test_hash_length_enforced() {
        let options = LevelOptions {
            time: Some(0),
            editor_window: Some(0),
            verified_replay: Some(0),
            hide_map: Some(0),
            read_only_option: Some(0),
            replay_hash: Some(vec![0; 15]),
            ..Default::default()
        };
        assert_eq!(options.encode().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_ambiguous_tail_rejected() {
        let options = LevelOptions {
            time: Some(5),
            extra: vec![1],
            ..Default::default()
        };
        // The tail byte would decode as editorWindow
        assert_eq!(options.validate().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_serde_names() {
        let options = LevelOptions {
            time: Some(1),
            legacy_boots: None,
            extra: vec![0xFF],
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"time":1,"extra":"/w=="}"#);
        assert!(serde_json::from_str::<LevelOptions>(r#"{"cc1Boots":1}"#).is_ok());
        assert!(serde_json::from_str::<LevelOptions>(r#"{"bogus":1}"#).is_err());
    }
}
