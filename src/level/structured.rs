//! Structured text form of a level (JSON or YAML).
//!
//! ```json
//! {
//!   "schema": "c2m.level.v1",
//!   "level": { "title": "...", "map": { "width": 2, ... }, "chunks": [...] }
//! }
//! ```
//!
//! Parsing applies the same checks decoding would, so a parsed document is
//! always encodable unless its text holds characters outside Windows-1252.

use super::document::LevelDocument;
use crate::common::{Error, Result};
use crate::config::{CodecOptions, TextFormat};
use serde::{Deserialize, Serialize};

/// Schema marker written to and required from every structured document.
pub const SCHEMA: &str = "c2m.level.v1";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema: &'static str,
    level: &'a LevelDocument,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    schema: String,
    #[serde(default)]
    level: LevelDocument,
}

/// Render a document as structured text.
///
/// JSON is pretty-printed with a trailing newline.
pub fn stringify(doc: &LevelDocument, format: TextFormat) -> Result<String> {
    let envelope = EnvelopeRef { schema: SCHEMA, level: doc };
    match format {
        TextFormat::Json => {
            let mut text = serde_json::to_string_pretty(&envelope)?;
            text.push('\n');
            Ok(text)
        },
        TextFormat::Yaml => serde_saphyr::to_string(&envelope)
            .map_err(|e| Error::Yaml(format!("failed to serialize level to YAML: {e}"))),
    }
}

/// Parse structured text with default options.
pub fn parse(text: &str, format: TextFormat) -> Result<LevelDocument> {
    parse_with(text, format, &CodecOptions::default())
}

/// Parse structured text.
///
/// # Errors
///
/// - [`Error::Json`] / [`Error::Yaml`] if the text is malformed or does not
///   have the document shape (unknown field, unknown tile name, grid length
///   mismatch, bad base64, ...)
/// - [`Error::InvalidFormat`] for a wrong schema marker, options breaking
///   the prefix rule, or a tile deeper than `options.max_tile_depth`
/// - [`Error::UnsupportedValue`] for a modifier the tile has no rule for
pub fn parse_with(text: &str, format: TextFormat, options: &CodecOptions) -> Result<LevelDocument> {
    let envelope: Envelope = match format {
        TextFormat::Json => serde_json::from_str(text)?,
        TextFormat::Yaml => serde_saphyr::from_str(text)
            .map_err(|e| Error::Yaml(format!("failed to parse level YAML: {e}")))?,
    };

    if envelope.schema != SCHEMA {
        return Err(Error::InvalidFormat(format!(
            "unsupported schema {:?}, expected {SCHEMA:?}",
            envelope.schema
        )));
    }

    let doc = envelope.level;
    if let Some(opts) = &doc.options {
        opts.validate()?;
    }
    if let Some(map) = &doc.map {
        map.validate(options.max_tile_depth)?;
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use crate::level::options::LevelOptions;
    use crate::map::{Direction, LogicGate, MapGrid, Modifier, TileId, TileSpec};

    fn sample() -> LevelDocument {
        let gate = TileSpec::new(TileId::LOGIC_GATE).with_modifier(Modifier::Logic(LogicGate::And(Direction::East)));
        LevelDocument {
            title: Some("Gates \u{20AC}".into()),
            options: Some(LevelOptions {
                time: Some(250),
                editor_window: Some(1),
                ..Default::default()
            }),
            map: Some(MapGrid::new(2, 1, vec![gate, TileSpec::new(TileId::WALL)]).unwrap()),
            key: Some(vec![0, 1, 2]),
            ..Default::default()
        }
    }

    #[test]
    fn test_json_layout() {
        let text = stringify(&LevelDocument::default(), TextFormat::Json).unwrap();
        assert_eq!(text, "{\n  \"schema\": \"c2m.level.v1\",\n  \"level\": {}\n}\n");
    }

    #[test]
    fn test_json_idempotent() {
        let doc = sample();
        let text = stringify(&doc, TextFormat::Json).unwrap();
        assert_eq!(parse(&text, TextFormat::Json).unwrap(), doc);
        assert!(text.contains("\"WALL\""), "{text}");
    }

    #[test]
    fn test_yaml_idempotent() {
        let doc = sample();
        let text = stringify(&doc, TextFormat::Yaml).unwrap();
        assert_eq!(parse(&text, TextFormat::Yaml).unwrap(), doc);
    }

    #[test]
    fn test_schema_checked() {
        let err = parse(r#"{"schema":"other","level":{}}"#, TextFormat::Json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        let err = parse(r#"{"level":{}}"#, TextFormat::Json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_semantic_checks() {
        let gap = r#"{"schema":"c2m.level.v1","level":{"options":{"time":1,"hideMap":0}}}"#;
        assert_eq!(parse(gap, TextFormat::Json).unwrap_err().kind(), ErrorKind::InvalidFormat);

        // FLOOR has no modifier rule
        let stray = r#"{"schema":"c2m.level.v1","level":{"map":{"width":1,"height":1,"tiles":[
            {"tile":"FLOOR","modifiers":[{"kind":"CUSTOM_STYLE","style":"PINK"}]}]}}}"#;
        assert_eq!(parse(stray, TextFormat::Json).unwrap_err().kind(), ErrorKind::UnsupportedValue);

        let unknown = r#"{"schema":"c2m.level.v1","level":{"colour":"red"}}"#;
        assert_eq!(parse(unknown, TextFormat::Json).unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_depth_limit() {
        let mut tile = TileSpec::new(TileId::FLOOR);
        for _ in 0..4 {
            tile = TileSpec::new(TileId::CHIP).with_dir(Direction::North).with_lower(tile);
        }
        let doc = LevelDocument {
            map: Some(MapGrid::filled(1, 1, tile)),
            ..Default::default()
        };
        let text = stringify(&doc, TextFormat::Json).unwrap();
        let tight = CodecOptions::new().with_max_tile_depth(3);
        assert_eq!(
            parse_with(&text, TextFormat::Json, &tight).unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
        assert!(parse(&text, TextFormat::Json).is_ok());
    }
}
