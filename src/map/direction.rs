//! Compass directions, corners and direction sets.
//!
//! [`DirectionSet`] uses the same bit layout as every direction mask in the
//! tile grammar (N=0x1, E=0x2, S=0x4, W=0x8), so converting to and from the
//! wire form is a plain `bits()` / `from_bits()`.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the four compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction stored as a byte 0..=3 (N, E, S, W).
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Rotate clockwise by `quarter_turns` steps.
    #[inline]
    pub fn rotated_cw(self, quarter_turns: u8) -> Self {
        Self::ALL[((self.index() + quarter_turns) % 4) as usize]
    }

    /// Whether this direction lies on the north/south axis.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// The single-flag set holding this direction.
    #[inline]
    pub fn flag(self) -> DirectionSet {
        match self {
            Direction::North => DirectionSet::N,
            Direction::East => DirectionSet::E,
            Direction::South => DirectionSet::S,
            Direction::West => DirectionSet::W,
        }
    }

    /// One-letter name used in identifier suffixes.
    pub fn letter(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

bitflags! {
    /// Set of directions (wire mask layout)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionSet: u8 {
        /// North
        const N = 0x01;
        /// East
        const E = 0x02;
        /// South
        const S = 0x04;
        /// West
        const W = 0x08;
    }
}

impl DirectionSet {
    /// Members in canonical N, E, S, W order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(d.flag()))
    }

    /// Apply `f` to every member.
    pub fn map(self, f: impl Fn(Direction) -> Direction) -> Self {
        self.directions().map(f).collect()
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DirectionSet::empty(), |set, d| set | d.flag())
    }
}

impl Serialize for DirectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.directions())
    }
}

impl<'de> Deserialize<'de> for DirectionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let dirs = Vec::<Direction>::deserialize(deserializer)?;
        Ok(dirs.into_iter().collect())
    }
}

/// One of the four corners of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Corner {
    Ne,
    Se,
    Sw,
    Nw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Ne, Corner::Se, Corner::Sw, Corner::Nw];

    /// The two edges meeting at this corner.
    pub fn edges(self) -> DirectionSet {
        match self {
            Corner::Ne => DirectionSet::N | DirectionSet::E,
            Corner::Se => DirectionSet::S | DirectionSet::E,
            Corner::Sw => DirectionSet::S | DirectionSet::W,
            Corner::Nw => DirectionSet::N | DirectionSet::W,
        }
    }

    /// Corner touching the given edges. Only the N and E bits are consulted:
    /// a set without N is taken as southern, a set without E as western.
    pub fn from_edges(edges: DirectionSet) -> Self {
        match (edges.contains(DirectionSet::N), edges.contains(DirectionSet::E)) {
            (true, true) => Corner::Ne,
            (false, true) => Corner::Se,
            (false, false) => Corner::Sw,
            (true, false) => Corner::Nw,
        }
    }

    /// Map both edges through `f` and return the corner they meet at.
    ///
    /// For any symmetry of the square `f` keeps perpendicular edges
    /// perpendicular, so the result is always a real corner.
    pub fn map(self, f: impl Fn(Direction) -> Direction) -> Self {
        Corner::from_edges(self.edges().map(f))
    }

    /// Two-letter name used in identifier suffixes.
    pub fn letters(self) -> &'static str {
        match self {
            Corner::Ne => "NE",
            Corner::Se => "SE",
            Corner::Sw => "SW",
            Corner::Nw => "NW",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letters())
    }
}
