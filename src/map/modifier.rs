//! Auxiliary numeric data attached to tiles.
//!
//! On the wire a modifier is just a number; its meaning depends on the
//! identifier of the frame it precedes. [`Modifier::decode`] interprets a raw
//! value against one [`ModifierKind`], and [`Modifier::value`] packs it back.
//! Values outside every defined sub-range are rejected rather than coerced.

use super::direction::{Corner, Direction, DirectionSet};
use crate::common::{Error, Result};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Modifier kinds, declared in canonical encode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKind {
    Wires,
    LetterSymbol,
    CloneArrows,
    CustomStyle,
    Logic,
    Tracks,
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModifierKind::Wires => "WIRES",
            ModifierKind::LetterSymbol => "LETTER_SYMBOL",
            ModifierKind::CloneArrows => "CLONE_ARROWS",
            ModifierKind::CustomStyle => "CUSTOM_STYLE",
            ModifierKind::Logic => "LOGIC",
            ModifierKind::Tracks => "TRACKS",
        })
    }
}

/// Decoded modifier value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Wires {
        wires: DirectionSet,
        tunnels: DirectionSet,
    },
    LetterSymbol {
        symbol: LetterSymbol,
    },
    CloneArrows {
        arrows: DirectionSet,
    },
    CustomStyle {
        style: CustomStyle,
    },
    Logic(LogicGate),
    Tracks {
        pieces: TrackPieces,
        active: TrackActive,
        entered: Direction,
    },
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Wires { .. } => ModifierKind::Wires,
            Modifier::LetterSymbol { .. } => ModifierKind::LetterSymbol,
            Modifier::CloneArrows { .. } => ModifierKind::CloneArrows,
            Modifier::CustomStyle { .. } => ModifierKind::CustomStyle,
            Modifier::Logic(_) => ModifierKind::Logic,
            Modifier::Tracks { .. } => ModifierKind::Tracks,
        }
    }

    /// Interpret a raw wire value under the given rule.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedValue`] when the value lies outside every sub-range
    /// the rule defines.
    pub fn decode(kind: ModifierKind, value: u32) -> Result<Self> {
        let unsupported = || Error::UnsupportedValue(format!("{kind} modifier value {value:#x}"));
        match kind {
            ModifierKind::Wires => {
                let byte = u8::try_from(value).map_err(|_| unsupported())?;
                Ok(Modifier::Wires {
                    wires: DirectionSet::from_bits_truncate(byte & 0x0F),
                    tunnels: DirectionSet::from_bits_truncate(byte >> 4),
                })
            },
            ModifierKind::LetterSymbol => {
                let byte = u8::try_from(value).map_err(|_| unsupported())?;
                LetterSymbol::from_byte(byte)
                    .map(|symbol| Modifier::LetterSymbol { symbol })
                    .ok_or_else(unsupported)
            },
            ModifierKind::CloneArrows => u8::try_from(value)
                .ok()
                .and_then(DirectionSet::from_bits)
                .map(|arrows| Modifier::CloneArrows { arrows })
                .ok_or_else(unsupported),
            ModifierKind::CustomStyle => u8::try_from(value)
                .ok()
                .and_then(CustomStyle::from_index)
                .map(|style| Modifier::CustomStyle { style })
                .ok_or_else(unsupported),
            ModifierKind::Logic => u8::try_from(value)
                .ok()
                .and_then(LogicGate::from_byte)
                .map(Modifier::Logic)
                .ok_or_else(unsupported),
            ModifierKind::Tracks => {
                let word = u16::try_from(value).map_err(|_| unsupported())?;
                let [low, high] = word.to_le_bytes();
                let pieces = TrackPieces::from_bits(low).ok_or_else(unsupported)?;
                let active = TrackActive::from_index(high & 0x0F).ok_or_else(unsupported)?;
                let entered = Direction::from_index(high >> 4).ok_or_else(unsupported)?;
                Ok(Modifier::Tracks {
                    pieces,
                    active,
                    entered,
                })
            },
        }
    }

    /// Check that this value survives a trip through its wire form.
    ///
    /// Catches hand-built values the decoder could never produce, such as a
    /// counter above 9 or an ASCII letter outside 0x20..=0x5F.
    pub fn validate(&self) -> Result<()> {
        let value = self.value();
        if Modifier::decode(self.kind(), value)? != *self {
            return Err(Error::UnsupportedValue(format!(
                "{} modifier {self:?} has no wire form",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Raw wire value. Zero means the modifier is omitted on encode.
    pub fn value(&self) -> u32 {
        match self {
            Modifier::Wires { wires, tunnels } => (wires.bits() | (tunnels.bits() << 4)) as u32,
            Modifier::LetterSymbol { symbol } => symbol.byte() as u32,
            Modifier::CloneArrows { arrows } => arrows.bits() as u32,
            Modifier::CustomStyle { style } => style.index() as u32,
            Modifier::Logic(gate) => gate.byte() as u32,
            Modifier::Tracks {
                pieces,
                active,
                entered,
            } => u16::from_le_bytes([pieces.bits(), active.index() | (entered.index() << 4)]) as u32,
        }
    }
}

bitflags! {
    /// Rail pieces present on a railroad track
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TrackPieces: u8 {
        const TURN_NE = 0x01;
        const TURN_SE = 0x02;
        const TURN_SW = 0x04;
        const TURN_NW = 0x08;
        const HORIZONTAL = 0x10;
        const VERTICAL = 0x20;
        const SWITCH = 0x40;
    }
}

impl TrackPieces {
    /// Turn piece flag for a corner.
    pub fn turn(corner: Corner) -> Self {
        match corner {
            Corner::Ne => TrackPieces::TURN_NE,
            Corner::Se => TrackPieces::TURN_SE,
            Corner::Sw => TrackPieces::TURN_SW,
            Corner::Nw => TrackPieces::TURN_NW,
        }
    }

    fn named() -> [(TrackPieces, &'static str); 7] {
        [
            (TrackPieces::TURN_NE, "TURN_NE"),
            (TrackPieces::TURN_SE, "TURN_SE"),
            (TrackPieces::TURN_SW, "TURN_SW"),
            (TrackPieces::TURN_NW, "TURN_NW"),
            (TrackPieces::HORIZONTAL, "HORIZONTAL"),
            (TrackPieces::VERTICAL, "VERTICAL"),
            (TrackPieces::SWITCH, "SWITCH"),
        ]
    }
}

impl Serialize for TrackPieces {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(
            Self::named()
                .into_iter()
                .filter(|(flag, _)| self.contains(*flag))
                .map(|(_, name)| name),
        )
    }
}

impl<'de> Deserialize<'de> for TrackPieces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(TrackPieces::empty(), |acc, name| {
            Self::named()
                .into_iter()
                .find(|(_, n)| n == name)
                .map(|(flag, _)| acc | flag)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown track piece {name:?}")))
        })
    }
}

/// Piece a track switch currently routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackActive {
    Turn(Corner),
    Horizontal,
    Vertical,
}

impl TrackActive {
    pub const ALL: [TrackActive; 6] = [
        TrackActive::Turn(Corner::Ne),
        TrackActive::Turn(Corner::Se),
        TrackActive::Turn(Corner::Sw),
        TrackActive::Turn(Corner::Nw),
        TrackActive::Horizontal,
        TrackActive::Vertical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrackActive::Turn(corner) => corner.letters(),
            TrackActive::Horizontal => "H",
            TrackActive::Vertical => "V",
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(TrackActive::Turn(Corner::Ne)),
            1 => Some(TrackActive::Turn(Corner::Se)),
            2 => Some(TrackActive::Turn(Corner::Sw)),
            3 => Some(TrackActive::Turn(Corner::Nw)),
            4 => Some(TrackActive::Horizontal),
            5 => Some(TrackActive::Vertical),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            TrackActive::Turn(Corner::Ne) => 0,
            TrackActive::Turn(Corner::Se) => 1,
            TrackActive::Turn(Corner::Sw) => 2,
            TrackActive::Turn(Corner::Nw) => 3,
            TrackActive::Horizontal => 4,
            TrackActive::Vertical => 5,
        }
    }
}

impl Serialize for TrackActive {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TrackActive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        TrackActive::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown active track piece {name:?}")))
    }
}

/// Appearance of a custom floor or wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomStyle {
    Green,
    Pink,
    Yellow,
    Blue,
}

impl CustomStyle {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(CustomStyle::Green),
            1 => Some(CustomStyle::Pink),
            2 => Some(CustomStyle::Yellow),
            3 => Some(CustomStyle::Blue),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            CustomStyle::Green => 0,
            CustomStyle::Pink => 1,
            CustomStyle::Yellow => 2,
            CustomStyle::Blue => 3,
        }
    }
}

/// Glyph shown on a letter tile: an arrow or a printable ASCII character
/// in 0x20..=0x5F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterSymbol {
    Arrow(Direction),
    Ascii(u8),
}

impl LetterSymbol {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x1C => Some(LetterSymbol::Arrow(Direction::North)),
            0x1D => Some(LetterSymbol::Arrow(Direction::East)),
            0x1E => Some(LetterSymbol::Arrow(Direction::South)),
            0x1F => Some(LetterSymbol::Arrow(Direction::West)),
            0x20..=0x5F => Some(LetterSymbol::Ascii(byte)),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            LetterSymbol::Arrow(dir) => 0x1C + dir.index(),
            LetterSymbol::Ascii(byte) => byte,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            LetterSymbol::Arrow(Direction::North) => '\u{2191}',
            LetterSymbol::Arrow(Direction::East) => '\u{2192}',
            LetterSymbol::Arrow(Direction::South) => '\u{2193}',
            LetterSymbol::Arrow(Direction::West) => '\u{2190}',
            LetterSymbol::Ascii(byte) => byte as char,
        }
    }

    pub fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '\u{2191}' => Some(LetterSymbol::Arrow(Direction::North)),
            '\u{2192}' => Some(LetterSymbol::Arrow(Direction::East)),
            '\u{2193}' => Some(LetterSymbol::Arrow(Direction::South)),
            '\u{2190}' => Some(LetterSymbol::Arrow(Direction::West)),
            ' '..='_' => Some(LetterSymbol::Ascii(ch as u8)),
            _ => None,
        }
    }
}

impl Serialize for LetterSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_char(self.glyph())
    }
}

impl<'de> Deserialize<'de> for LetterSymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => LetterSymbol::from_glyph(ch)
                .ok_or_else(|| serde::de::Error::custom(format!("no letter tile glyph for {ch:?}"))),
            _ => Err(serde::de::Error::custom(format!(
                "letter symbol must be a single character, got {text:?}"
            ))),
        }
    }
}

/// Logic gate configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LogicRepr", into = "LogicRepr")]
pub enum LogicGate {
    Inverter(Direction),
    And(Direction),
    Or(Direction),
    Xor(Direction),
    LatchCw(Direction),
    Nand(Direction),
    LatchCcw(Direction),
    Counter(u8),
}

/// Gate byte sub-ranges. Each base starts a block of four facings.
const INVERTER_BASE: u8 = 0x00;
const AND_BASE: u8 = 0x04;
const OR_BASE: u8 = 0x08;
const XOR_BASE: u8 = 0x0C;
const LATCH_CW_BASE: u8 = 0x10;
const NAND_BASE: u8 = 0x14;
const COUNTER_BASE: u8 = 0x1E;
const LATCH_CCW_BASE: u8 = 0x40;

impl LogicGate {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let facing = |base: u8| Direction::from_index(byte - base);
        match byte {
            0x00..=0x03 => facing(INVERTER_BASE).map(LogicGate::Inverter),
            0x04..=0x07 => facing(AND_BASE).map(LogicGate::And),
            0x08..=0x0B => facing(OR_BASE).map(LogicGate::Or),
            0x0C..=0x0F => facing(XOR_BASE).map(LogicGate::Xor),
            0x10..=0x13 => facing(LATCH_CW_BASE).map(LogicGate::LatchCw),
            0x14..=0x17 => facing(NAND_BASE).map(LogicGate::Nand),
            0x1E..=0x27 => Some(LogicGate::Counter(byte - COUNTER_BASE)),
            0x40..=0x43 => facing(LATCH_CCW_BASE).map(LogicGate::LatchCcw),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            LogicGate::Inverter(d) => INVERTER_BASE + d.index(),
            LogicGate::And(d) => AND_BASE + d.index(),
            LogicGate::Or(d) => OR_BASE + d.index(),
            LogicGate::Xor(d) => XOR_BASE + d.index(),
            LogicGate::LatchCw(d) => LATCH_CW_BASE + d.index(),
            LogicGate::Nand(d) => NAND_BASE + d.index(),
            LogicGate::LatchCcw(d) => LATCH_CCW_BASE + d.index(),
            LogicGate::Counter(n) => COUNTER_BASE.saturating_add(n),
        }
    }

    /// Facing of a directional gate; `None` for a counter.
    pub fn facing(self) -> Option<Direction> {
        match self {
            LogicGate::Inverter(d)
            | LogicGate::And(d)
            | LogicGate::Or(d)
            | LogicGate::Xor(d)
            | LogicGate::LatchCw(d)
            | LogicGate::Nand(d)
            | LogicGate::LatchCcw(d) => Some(d),
            LogicGate::Counter(_) => None,
        }
    }

    /// Same gate pointing the other way. Counters are unchanged.
    pub fn with_facing(self, facing: Direction) -> Self {
        match self {
            LogicGate::Inverter(_) => LogicGate::Inverter(facing),
            LogicGate::And(_) => LogicGate::And(facing),
            LogicGate::Or(_) => LogicGate::Or(facing),
            LogicGate::Xor(_) => LogicGate::Xor(facing),
            LogicGate::LatchCw(_) => LogicGate::LatchCw(facing),
            LogicGate::Nand(_) => LogicGate::Nand(facing),
            LogicGate::LatchCcw(_) => LogicGate::LatchCcw(facing),
            LogicGate::Counter(n) => LogicGate::Counter(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum GateName {
    Inverter,
    And,
    Or,
    Xor,
    LatchCw,
    Nand,
    LatchCcw,
    Counter,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogicRepr {
    gate: GateName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facing: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    counter_value: Option<u8>,
}

impl From<LogicGate> for LogicRepr {
    fn from(gate: LogicGate) -> Self {
        let name = match gate {
            LogicGate::Inverter(_) => GateName::Inverter,
            LogicGate::And(_) => GateName::And,
            LogicGate::Or(_) => GateName::Or,
            LogicGate::Xor(_) => GateName::Xor,
            LogicGate::LatchCw(_) => GateName::LatchCw,
            LogicGate::Nand(_) => GateName::Nand,
            LogicGate::LatchCcw(_) => GateName::LatchCcw,
            LogicGate::Counter(_) => GateName::Counter,
        };
        let counter_value = match gate {
            LogicGate::Counter(n) => Some(n),
            _ => None,
        };
        LogicRepr {
            gate: name,
            facing: gate.facing(),
            counter_value,
        }
    }
}

impl TryFrom<LogicRepr> for LogicGate {
    type Error = String;

    fn try_from(repr: LogicRepr) -> std::result::Result<Self, Self::Error> {
        let directional: fn(Direction) -> LogicGate = match repr.gate {
            GateName::Inverter => LogicGate::Inverter,
            GateName::And => LogicGate::And,
            GateName::Or => LogicGate::Or,
            GateName::Xor => LogicGate::Xor,
            GateName::LatchCw => LogicGate::LatchCw,
            GateName::Nand => LogicGate::Nand,
            GateName::LatchCcw => LogicGate::LatchCcw,
            GateName::Counter => {
                return match (repr.facing, repr.counter_value) {
                    (None, Some(n)) if n <= 9 => Ok(LogicGate::Counter(n)),
                    _ => Err("COUNTER gate takes a counterValue in 0..=9 and no facing".to_string()),
                };
            },
        };
        match (repr.facing, repr.counter_value) {
            (Some(d), None) => Ok(directional(d)),
            _ => Err(format!("{:?} gate takes a facing and no counterValue", repr.gate)),
        }
    }
}
