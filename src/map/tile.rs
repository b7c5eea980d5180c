//! Semantic tile tree.
//!
//! A [`TileSpec`] is one layer of a map cell. Layers stack through `lower`
//! until a terminal identifier ends the chain. In structured text a layer
//! with no optional fields is written as its bare identifier name.

use super::catalog::{TileId, TileShape};
use super::direction::{Direction, DirectionSet};
use super::modifier::Modifier;
use crate::common::{Error, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Bit carried next to the wall directions in a canopy mask.
const CANOPY_FLAG: u8 = 0x10;

/// Thin walls and canopy on a `THINWALL_CANOPY` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ThinWallCanopy {
    #[serde(default)]
    pub walls: DirectionSet,
    #[serde(default)]
    pub canopy: bool,
}

impl ThinWallCanopy {
    /// Parse a wire mask; `None` if bits above the canopy flag are set.
    pub fn from_mask(mask: u8) -> Option<Self> {
        if mask & !(CANOPY_FLAG | DirectionSet::all().bits()) != 0 {
            return None;
        }
        Some(Self {
            walls: DirectionSet::from_bits_truncate(mask),
            canopy: mask & CANOPY_FLAG != 0,
        })
    }

    pub fn mask(self) -> u8 {
        self.walls.bits() | if self.canopy { CANOPY_FLAG } else { 0 }
    }
}

/// One layer of a map cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSpec {
    pub tile: TileId,
    /// Facing of a creature, block or mirror
    pub dir: Option<Direction>,
    pub thin_wall_canopy: Option<ThinWallCanopy>,
    /// Pass-through sides of a directional block
    pub directional_arrows: Option<DirectionSet>,
    /// Canonically ordered, no zero-valued entries
    pub modifiers: Vec<Modifier>,
    /// Layer underneath this one
    pub lower: Option<Box<TileSpec>>,
}

impl TileSpec {
    /// A layer with no optional fields.
    pub fn new(tile: TileId) -> Self {
        Self {
            tile,
            dir: None,
            thin_wall_canopy: None,
            directional_arrows: None,
            modifiers: Vec::new(),
            lower: None,
        }
    }

    #[inline]
    pub fn with_dir(mut self, dir: Direction) -> Self {
        self.dir = Some(dir);
        self
    }

    #[inline]
    pub fn with_lower(mut self, lower: TileSpec) -> Self {
        self.lower = Some(Box::new(lower));
        self
    }

    #[inline]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[inline]
    pub fn with_thin_wall_canopy(mut self, walls: ThinWallCanopy) -> Self {
        self.thin_wall_canopy = Some(walls);
        self
    }

    #[inline]
    pub fn with_directional_arrows(mut self, arrows: DirectionSet) -> Self {
        self.directional_arrows = Some(arrows);
        self
    }

    /// Whether this layer serializes as a bare identifier.
    pub fn is_bare(&self) -> bool {
        self.dir.is_none()
            && self.thin_wall_canopy.is_none()
            && self.directional_arrows.is_none()
            && self.modifiers.is_empty()
            && self.lower.is_none()
    }

    /// This layer followed by every layer beneath it.
    pub fn layers(&self) -> impl Iterator<Item = &TileSpec> {
        std::iter::successors(Some(self), |t| t.lower.as_deref())
    }

    /// Sort modifiers into canonical order and drop zero-valued ones.
    pub fn canonicalize(&mut self) {
        let mut layer = Some(self);
        while let Some(t) = layer {
            t.modifiers.retain(|m| m.value() != 0);
            t.modifiers.sort_by_key(Modifier::kind);
            layer = t.lower.as_deref_mut();
        }
    }

    /// Check every layer against the catalog.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] for more than `max_depth` layers, a field
    ///   the identifier's shape forbids or lacks, or a width-tag identifier
    /// - [`Error::UnsupportedValue`] for a modifier the identifier takes no
    ///   rule for, or a value with no wire form
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        for (level, layer) in self.layers().enumerate() {
            if level >= max_depth {
                return Err(Error::InvalidFormat(format!(
                    "tile stacks more than {max_depth} layers"
                )));
            }
            layer.check_layer()?;
        }
        Ok(())
    }

    /// Shape and modifier checks for this layer alone.
    pub(crate) fn check_layer(&self) -> Result<()> {
        let tile = self.tile;
        if tile.is_width_tag() {
            return Err(Error::InvalidFormat(format!(
                "{tile} is a modifier width tag, not a tile"
            )));
        }

        let shape = tile.shape();
        let takes_dir = matches!(shape, TileShape::DirectionAndLower | TileShape::DirectionalBlock);
        let forbid = |field: &str| Error::InvalidFormat(format!("{tile} does not take {field}"));
        let require = |field: &str| Error::InvalidFormat(format!("{tile} requires {field}"));

        match (takes_dir, self.dir) {
            (true, None) => return Err(require("a direction")),
            (false, Some(_)) => return Err(forbid("a direction")),
            _ => {},
        }
        if self.thin_wall_canopy.is_some() && shape != TileShape::Canopy {
            return Err(forbid("thin walls"));
        }
        if self.directional_arrows.is_some() && shape != TileShape::DirectionalBlock {
            return Err(forbid("directional arrows"));
        }
        match (shape, &self.lower) {
            (TileShape::Terminal, Some(_)) => return Err(forbid("a lower layer")),
            (TileShape::Terminal, None) | (_, Some(_)) => {},
            (_, None) => return Err(require("a lower layer")),
        }

        for modifier in &self.modifiers {
            if tile.modifier_rule() != Some(modifier.kind()) {
                return Err(Error::UnsupportedValue(format!(
                    "{tile} takes no {} modifier",
                    modifier.kind()
                )));
            }
            modifier.validate()?;
        }
        Ok(())
    }
}

impl From<TileId> for TileSpec {
    fn from(tile: TileId) -> Self {
        TileSpec::new(tile)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileObjectRef<'a> {
    tile: TileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thin_wall_canopy: Option<ThinWallCanopy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directional_arrows: Option<DirectionSet>,
    #[serde(skip_serializing_if = "no_modifiers")]
    modifiers: &'a [Modifier],
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<&'a TileSpec>,
}

fn no_modifiers(modifiers: &&[Modifier]) -> bool {
    modifiers.is_empty()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TileObject {
    tile: TileId,
    #[serde(default)]
    dir: Option<Direction>,
    #[serde(default)]
    thin_wall_canopy: Option<ThinWallCanopy>,
    #[serde(default)]
    directional_arrows: Option<DirectionSet>,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    lower: Option<Box<TileSpec>>,
}

impl Serialize for TileSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_bare() {
            return self.tile.serialize(serializer);
        }
        TileObjectRef {
            tile: self.tile,
            dir: self.dir,
            thin_wall_canopy: self.thin_wall_canopy,
            directional_arrows: self.directional_arrows,
            modifiers: &self.modifiers,
            lower: self.lower.as_deref(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TileSpecVisitor)
    }
}

struct TileSpecVisitor;

impl<'de> Visitor<'de> for TileSpecVisitor {
    type Value = TileSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tile name or a tile object")
    }

    fn visit_str<E: de::Error>(self, name: &str) -> std::result::Result<TileSpec, E> {
        name.parse::<TileId>().map(TileSpec::new).map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<TileSpec, A::Error> {
        let object = TileObject::deserialize(de::value::MapAccessDeserializer::new(map))?;
        // Lower layers arrive canonicalized by their own visitor
        let mut modifiers = object.modifiers;
        modifiers.retain(|m| m.value() != 0);
        modifiers.sort_by_key(Modifier::kind);
        Ok(TileSpec {
            tile: object.tile,
            dir: object.dir,
            thin_wall_canopy: object.thin_wall_canopy,
            directional_arrows: object.directional_arrows,
            modifiers,
            lower: object.lower,
        })
    }
}
