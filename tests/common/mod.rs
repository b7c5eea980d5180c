//! Shared helpers for the integration tests.
#![allow(dead_code)]

use c2m::map::{
    CustomStyle, Direction, DirectionSet, LetterSymbol, LogicGate, Modifier, ThinWallCanopy, TileId, TrackActive,
    TrackPieces,
};
use c2m::{LevelDocument, LevelOptions, MapGrid, TileSpec};
use c2m::{Chunk, ChunkTag};
use proptest::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One raw chunk: tag, u32 LE length, payload.
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend((payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn end_chunk() -> Vec<u8> {
    chunk(b"END ", &[])
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn direction_set() -> impl Strategy<Value = DirectionSet> {
    (0u8..16).prop_map(DirectionSet::from_bits_truncate)
}

fn modifier_layer() -> impl Strategy<Value = TileSpec> {
    prop_oneof![
        (direction_set(), direction_set())
            .prop_filter("zero wires", |(w, t)| !(w.is_empty() && t.is_empty()))
            .prop_map(|(wires, tunnels)| {
                TileSpec::new(TileId::FLOOR).with_modifier(Modifier::Wires { wires, tunnels })
            }),
        direction_set()
            .prop_filter("no arrows", |a| !a.is_empty())
            .prop_map(|arrows| TileSpec::new(TileId::CLONE_MACHINE).with_modifier(Modifier::CloneArrows { arrows })),
        prop::sample::select(vec![CustomStyle::Pink, CustomStyle::Yellow, CustomStyle::Blue])
            .prop_map(|style| TileSpec::new(TileId::CUSTOM_WALL).with_modifier(Modifier::CustomStyle { style })),
        any::<u8>()
            .prop_filter_map("no letter", LetterSymbol::from_byte)
            .prop_map(|symbol| Modifier::LetterSymbol { symbol })
            .prop_filter("zero letter", |m| m.value() != 0)
            .prop_map(|m| TileSpec::new(TileId::LETTER_TILE).with_modifier(m)),
        any::<u8>()
            .prop_filter_map("no gate", LogicGate::from_byte)
            .prop_map(Modifier::Logic)
            .prop_filter("zero gate", |m| m.value() != 0)
            .prop_map(|m| TileSpec::new(TileId::LOGIC_GATE).with_modifier(m)),
        (0u8..0x80, prop::sample::select(TrackActive::ALL.to_vec()), direction())
            .prop_map(|(bits, active, entered)| Modifier::Tracks {
                pieces: TrackPieces::from_bits_truncate(bits),
                active,
                entered,
            })
            .prop_filter("unencodable or zero track", |m| m.validate().is_ok() && m.value() != 0)
            .prop_map(|m| TileSpec::new(TileId::RAILROAD_TRACK).with_modifier(m)),
    ]
}

/// A single terminal layer.
pub fn terminal_layer() -> impl Strategy<Value = TileSpec> {
    prop_oneof![
        3 => prop::sample::select(vec![
            0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
        ])
        .prop_map(|id| TileSpec::new(TileId(id))),
        2 => modifier_layer(),
    ]
}

/// A full cell: terminal layers under up to three stacked layers.
pub fn tile() -> impl Strategy<Value = TileSpec> {
    terminal_layer().prop_recursive(3, 24, 1, |inner| {
        prop_oneof![
            (prop::sample::select(vec![TileId::CHIP, TileId::DIRT_BLOCK]), direction(), inner.clone())
                .prop_map(|(id, dir, lower)| TileSpec::new(id).with_dir(dir).with_lower(lower)),
            (direction_set(), any::<bool>(), inner.clone()).prop_map(|(walls, canopy, lower)| {
                TileSpec::new(TileId::THINWALL_CANOPY)
                    .with_thin_wall_canopy(ThinWallCanopy { walls, canopy })
                    .with_lower(lower)
            }),
            (direction(), direction_set(), inner).prop_map(|(dir, arrows, lower)| {
                TileSpec::new(TileId::DIRECTIONAL_BLOCK)
                    .with_dir(dir)
                    .with_directional_arrows(arrows)
                    .with_lower(lower)
            }),
        ]
    })
}

pub fn grid() -> impl Strategy<Value = MapGrid> {
    (1u8..6, 1u8..6).prop_flat_map(|(w, h)| {
        prop::collection::vec(tile(), w as usize * h as usize)
            .prop_map(move |tiles| MapGrid::new(w, h, tiles).expect("length matches"))
    })
}

fn text() -> impl Strategy<Value = String> {
    "[ -~\u{20AC}\u{E9}]{0,24}"
}

fn blob() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Documents without an original chunk list.
pub fn fresh_document() -> impl Strategy<Value = LevelDocument> {
    let texts = (
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
    );
    let extras = prop::collection::vec(
        (prop::sample::select(vec![*b"XTRA", *b"ZZZZ", [0, 1, 0xFE, 0xFF]]), blob())
            .prop_map(|(tag, data)| Chunk::new(ChunkTag(tag), data)),
        0..3,
    );
    (
        texts,
        prop::option::of(prop::collection::vec(any::<u8>(), 0..32)),
        any::<bool>(),
        prop::option::of(grid()),
        prop::option::of(blob()),
        prop::option::of(blob()),
        extras,
    )
        .prop_map(|((title, author, clue, note), options, read_only, map, key, replay, extra_chunks)| {
            LevelDocument {
                title,
                author,
                clue,
                note,
                // Any byte string decodes to a valid options record
                options: options.map(|raw| LevelOptions::decode(&raw).expect("options decode is total")),
                read_only,
                map,
                key,
                replay,
                extra_chunks,
                ..Default::default()
            }
        })
}
