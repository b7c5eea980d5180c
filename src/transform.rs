//! Grid symmetries.
//!
//! Each [`Transform`] is one of the seven non-identity symmetries of a
//! rectangle's grid. It moves cells, and it re-points every direction, corner
//! and axis stored in the tile tree: facings, thin walls, arrows, wires and
//! tunnels, clone arrows, track pieces, gate facings, letter-tile arrows and
//! direction-suffixed identifiers. Applying a transform and then its
//! [`inverse`](Transform::inverse) restores the original grid exactly.

use crate::common::{Error, Result};
use crate::map::{
    Corner, Direction, LetterSymbol, MapGrid, Modifier, ThinWallCanopy, TileSpec, TrackActive,
    TrackPieces,
};
use log::trace;
use std::fmt;
use std::str::FromStr;

/// A non-identity grid symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Quarter turn clockwise
    Rotate90,
    Rotate180,
    /// Quarter turn counter-clockwise
    Rotate270,
    /// Mirror left to right (E and W swap)
    FlipHorizontal,
    /// Mirror top to bottom (N and S swap)
    FlipVertical,
    /// Mirror across the NW-SE diagonal (transpose)
    FlipDiagonalNwSe,
    /// Mirror across the NE-SW diagonal
    FlipDiagonalNeSw,
}

impl Transform {
    pub const ALL: [Transform; 7] = [
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
        Transform::FlipDiagonalNwSe,
        Transform::FlipDiagonalNeSw,
    ];

    /// The transform that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Transform::Rotate90 => Transform::Rotate270,
            Transform::Rotate270 => Transform::Rotate90,
            other => other,
        }
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Transform::Rotate90
                | Transform::Rotate270
                | Transform::FlipDiagonalNwSe
                | Transform::FlipDiagonalNeSw
        )
    }

    /// Dimensions of the transformed grid.
    pub fn output_size(self, width: u8, height: u8) -> (u8, u8) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Where cell `(x, y)` of a `width` x `height` grid lands.
    pub fn map_position(self, x: usize, y: usize, width: usize, height: usize) -> (usize, usize) {
        let (w, h) = (width, height);
        match self {
            Transform::Rotate90 => (h - 1 - y, x),
            Transform::Rotate180 => (w - 1 - x, h - 1 - y),
            Transform::Rotate270 => (y, w - 1 - x),
            Transform::FlipHorizontal => (w - 1 - x, y),
            Transform::FlipVertical => (x, h - 1 - y),
            Transform::FlipDiagonalNwSe => (y, x),
            Transform::FlipDiagonalNeSw => (h - 1 - y, w - 1 - x),
        }
    }

    pub fn map_direction(self, dir: Direction) -> Direction {
        use Direction::*;
        match self {
            Transform::Rotate90 => dir.rotated_cw(1),
            Transform::Rotate180 => dir.rotated_cw(2),
            Transform::Rotate270 => dir.rotated_cw(3),
            Transform::FlipHorizontal => match dir {
                East => West,
                West => East,
                other => other,
            },
            Transform::FlipVertical => match dir {
                North => South,
                South => North,
                other => other,
            },
            Transform::FlipDiagonalNwSe => match dir {
                North => West,
                West => North,
                East => South,
                South => East,
            },
            Transform::FlipDiagonalNeSw => match dir {
                North => East,
                East => North,
                South => West,
                West => South,
            },
        }
    }

    /// Corners follow the two edges they touch.
    pub fn map_corner(self, corner: Corner) -> Corner {
        corner.map(|d| self.map_direction(d))
    }

    /// Transform a whole grid.
    pub fn apply(self, grid: &MapGrid) -> MapGrid {
        let (width, height) = (grid.width(), grid.height());
        let (out_w, out_h) = self.output_size(width, height);
        trace!("{self}: {width}x{height} -> {out_w}x{out_h}");

        // Walk the output in row-major order and pull each cell from its source
        let inverse = self.inverse();
        let src = grid.tiles();
        let mut tiles = Vec::with_capacity(src.len());
        for y in 0..out_h as usize {
            for x in 0..out_w as usize {
                let (sx, sy) = inverse.map_position(x, y, out_w as usize, out_h as usize);
                tiles.push(self.apply_tile(&src[sy * width as usize + sx]));
            }
        }
        MapGrid::from_parts(out_w, out_h, tiles)
    }

    /// Transform every layer of one cell.
    pub fn apply_tile(self, tile: &TileSpec) -> TileSpec {
        let mut top = self.apply_layer(tile);
        let mut slot = &mut top.lower;
        let mut source = tile.lower.as_deref();
        while let Some(layer) = source {
            let mapped = slot.insert(Box::new(self.apply_layer(layer)));
            slot = &mut mapped.lower;
            source = layer.lower.as_deref();
        }
        top
    }

    /// Transform one layer; the result has no lower layer.
    fn apply_layer(self, layer: &TileSpec) -> TileSpec {
        let dir = |d: Direction| self.map_direction(d);
        let mut modifiers: Vec<Modifier> = layer
            .modifiers
            .iter()
            .map(|m| self.apply_modifier(*m))
            .collect();
        modifiers.sort_by_key(Modifier::kind);

        TileSpec {
            tile: layer.tile.reoriented(dir),
            dir: layer.dir.map(dir),
            thin_wall_canopy: layer.thin_wall_canopy.map(|tw| ThinWallCanopy {
                walls: tw.walls.map(dir),
                canopy: tw.canopy,
            }),
            directional_arrows: layer.directional_arrows.map(|arrows| arrows.map(dir)),
            modifiers,
            lower: None,
        }
    }

    fn apply_modifier(self, modifier: Modifier) -> Modifier {
        let dir = |d: Direction| self.map_direction(d);
        match modifier {
            Modifier::Wires { wires, tunnels } => Modifier::Wires {
                wires: wires.map(dir),
                tunnels: tunnels.map(dir),
            },
            Modifier::LetterSymbol { symbol } => Modifier::LetterSymbol {
                symbol: match symbol {
                    LetterSymbol::Arrow(d) => LetterSymbol::Arrow(dir(d)),
                    LetterSymbol::Ascii(byte) => LetterSymbol::Ascii(byte),
                },
            },
            Modifier::CloneArrows { arrows } => Modifier::CloneArrows {
                arrows: arrows.map(dir),
            },
            Modifier::CustomStyle { style } => Modifier::CustomStyle { style },
            Modifier::Logic(gate) => Modifier::Logic(match gate.facing() {
                Some(facing) => gate.with_facing(dir(facing)),
                None => gate,
            }),
            Modifier::Tracks {
                pieces,
                active,
                entered,
            } => Modifier::Tracks {
                pieces: self.map_track_pieces(pieces),
                active: self.map_track_active(active),
                entered: dir(entered),
            },
        }
    }

    fn map_track_pieces(self, pieces: TrackPieces) -> TrackPieces {
        let mut out = pieces & TrackPieces::SWITCH;
        for corner in Corner::ALL {
            if pieces.contains(TrackPieces::turn(corner)) {
                out |= TrackPieces::turn(self.map_corner(corner));
            }
        }
        let (horizontal, vertical) = if self.swaps_axes() {
            (TrackPieces::VERTICAL, TrackPieces::HORIZONTAL)
        } else {
            (TrackPieces::HORIZONTAL, TrackPieces::VERTICAL)
        };
        if pieces.contains(TrackPieces::HORIZONTAL) {
            out |= horizontal;
        }
        if pieces.contains(TrackPieces::VERTICAL) {
            out |= vertical;
        }
        out
    }

    fn map_track_active(self, active: TrackActive) -> TrackActive {
        match (active, self.swaps_axes()) {
            (TrackActive::Turn(corner), _) => TrackActive::Turn(self.map_corner(corner)),
            (TrackActive::Horizontal, true) => TrackActive::Vertical,
            (TrackActive::Vertical, true) => TrackActive::Horizontal,
            (axis, false) => axis,
        }
    }

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Transform::Rotate90 => "rot90",
            Transform::Rotate180 => "rot180",
            Transform::Rotate270 => "rot270",
            Transform::FlipHorizontal => "flip-h",
            Transform::FlipVertical => "flip-v",
            Transform::FlipDiagonalNwSe => "flip-nwse",
            Transform::FlipDiagonalNeSw => "flip-nesw",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = Error;

    /// Case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let kind = match key.as_str() {
            "rot90" | "rotate90" | "rotate-90" | "r90" => Transform::Rotate90,
            "rot180" | "rotate180" | "rotate-180" | "r180" => Transform::Rotate180,
            "rot270" | "rotate270" | "rotate-270" | "r270" => Transform::Rotate270,
            "flip-h" | "fliph" | "flip-horizontal" | "mirror-h" => Transform::FlipHorizontal,
            "flip-v" | "flipv" | "flip-vertical" | "mirror-v" => Transform::FlipVertical,
            "flip-nwse" | "flip-diag-nwse" | "diag-nwse" => Transform::FlipDiagonalNwSe,
            "flip-nesw" | "flip-diag-nesw" | "diag-nesw" => Transform::FlipDiagonalNeSw,
            _ => {
                return Err(Error::InvalidFormat(format!(
                    "unknown transform {s:?}, expected one of rot90, rot180, rot270, flip-h, flip-v, flip-nwse, flip-nesw"
                )));
            },
        };
        Ok(kind)
    }
}

impl MapGrid {
    /// This grid with `transform` applied.
    pub fn transformed(&self, transform: Transform) -> MapGrid {
        transform.apply(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DirectionSet, LogicGate, TileId};

    fn chip(dir: Direction) -> TileSpec {
        TileSpec::new(TileId::CHIP)
            .with_dir(dir)
            .with_lower(TileSpec::new(TileId::FLOOR))
    }

    #[test]
    fn test_rotate90_scenario() {
        let grid = MapGrid::new(2, 1, vec![TileSpec::new(TileId::FORCE_N), TileSpec::new(TileId::WALL)]).unwrap();
        let rotated = grid.transformed(Transform::Rotate90);

        assert_eq!((rotated.width(), rotated.height()), (1, 2));
        // (0,0) -> (h-1-y, x) = (0, 0); (1,0) -> (0, 1)
        assert_eq!(rotated.tiles()[0], TileSpec::new(TileId::FORCE_E));
        assert_eq!(rotated.tiles()[1], TileSpec::new(TileId::WALL));
    }

    #[test]
    fn test_direction_tables() {
        use Direction::*;
        let row = |t: Transform| Direction::ALL.map(|d| t.map_direction(d));
        assert_eq!(row(Transform::Rotate90), [East, South, West, North]);
        assert_eq!(row(Transform::Rotate180), [South, West, North, East]);
        assert_eq!(row(Transform::Rotate270), [West, North, East, South]);
        assert_eq!(row(Transform::FlipHorizontal), [North, West, South, East]);
        assert_eq!(row(Transform::FlipVertical), [South, East, North, West]);
        assert_eq!(row(Transform::FlipDiagonalNwSe), [West, South, East, North]);
        assert_eq!(row(Transform::FlipDiagonalNeSw), [East, North, West, South]);
    }

    #[test]
    fn test_corner_tables() {
        assert_eq!(Transform::Rotate90.map_corner(Corner::Ne), Corner::Se);
        assert_eq!(Transform::FlipHorizontal.map_corner(Corner::Ne), Corner::Nw);
        assert_eq!(Transform::FlipVertical.map_corner(Corner::Ne), Corner::Se);
        assert_eq!(Transform::FlipDiagonalNwSe.map_corner(Corner::Ne), Corner::Sw);
        assert_eq!(Transform::FlipDiagonalNwSe.map_corner(Corner::Nw), Corner::Nw);
        assert_eq!(Transform::FlipDiagonalNeSw.map_corner(Corner::Ne), Corner::Ne);
        assert_eq!(Transform::FlipDiagonalNeSw.map_corner(Corner::Nw), Corner::Se);
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let (w, h) = (5usize, 3usize);
        for t in Transform::ALL {
            let (ow, oh) = t.output_size(w as u8, h as u8);
            let mut seen = vec![false; w * h];
            for y in 0..h {
                for x in 0..w {
                    let (nx, ny) = t.map_position(x, y, w, h);
                    assert!(nx < ow as usize && ny < oh as usize, "{t}");
                    seen[ny * ow as usize + nx] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "{t} is not a bijection");
        }
    }

    #[test]
    fn test_every_direction_field_moves() {
        let tile = TileSpec::new(TileId::DIRECTIONAL_BLOCK)
            .with_dir(Direction::North)
            .with_directional_arrows(DirectionSet::N | DirectionSet::E)
            .with_lower(
                TileSpec::new(TileId::LOGIC_GATE)
                    .with_modifier(Modifier::Logic(LogicGate::Or(Direction::West))),
            );
        let out = Transform::Rotate90.apply_tile(&tile);
        assert_eq!(out.dir, Some(Direction::East));
        assert_eq!(out.directional_arrows, Some(DirectionSet::E | DirectionSet::S));
        let gate = out.lower.as_deref().map(|l| l.modifiers.clone());
        assert_eq!(gate, Some(vec![Modifier::Logic(LogicGate::Or(Direction::North))]));
    }

    #[test]
    fn test_tracks_swap_axes_on_diagonals() {
        let track = Modifier::Tracks {
            pieces: TrackPieces::HORIZONTAL | TrackPieces::TURN_NE | TrackPieces::SWITCH,
            active: TrackActive::Horizontal,
            entered: Direction::South,
        };
        let tile = TileSpec::new(TileId::RAILROAD_TRACK).with_modifier(track);

        let out = Transform::FlipDiagonalNwSe.apply_tile(&tile);
        assert_eq!(
            out.modifiers,
            vec![Modifier::Tracks {
                pieces: TrackPieces::VERTICAL | TrackPieces::TURN_SW | TrackPieces::SWITCH,
                active: TrackActive::Vertical,
                entered: Direction::East,
            }]
        );

        let out = Transform::FlipVertical.apply_tile(&tile);
        assert_eq!(
            out.modifiers,
            vec![Modifier::Tracks {
                pieces: TrackPieces::HORIZONTAL | TrackPieces::TURN_SE | TrackPieces::SWITCH,
                active: TrackActive::Horizontal,
                entered: Direction::North,
            }]
        );
    }

    #[test]
    fn test_letter_arrows_rotate() {
        let arrow = |d| Modifier::LetterSymbol {
            symbol: LetterSymbol::Arrow(d),
        };
        let tile = TileSpec::new(TileId::LETTER_TILE).with_modifier(arrow(Direction::North));
        let out = Transform::Rotate270.apply_tile(&tile);
        assert_eq!(out.modifiers, vec![arrow(Direction::West)]);

        let letter = TileSpec::new(TileId::LETTER_TILE).with_modifier(Modifier::LetterSymbol {
            symbol: LetterSymbol::Ascii(b'Q'),
        });
        assert_eq!(Transform::Rotate90.apply_tile(&letter), letter);
    }

    #[test]
    fn test_group_laws_on_small_grid() {
        let tiles = vec![
            chip(Direction::North),
            TileSpec::new(TileId(0x06)),
            TileSpec::new(TileId(0x49)),
            TileSpec::new(TileId(0x0D)),
            TileSpec::new(TileId::WALL),
            chip(Direction::West),
        ];
        let grid = MapGrid::new(3, 2, tiles).unwrap();

        let r90 = |g: &MapGrid| g.transformed(Transform::Rotate90);
        assert_eq!(r90(&r90(&r90(&r90(&grid)))), grid);
        assert_eq!(r90(&r90(&grid)), grid.transformed(Transform::Rotate180));
        assert_eq!(
            grid.transformed(Transform::FlipHorizontal)
                .transformed(Transform::FlipVertical),
            grid.transformed(Transform::Rotate180)
        );
        for t in Transform::ALL {
            assert_eq!(grid.transformed(t).transformed(t.inverse()), grid, "{t}");
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("rot90".parse::<Transform>().unwrap(), Transform::Rotate90);
        assert_eq!("ROTATE_90".parse::<Transform>().unwrap(), Transform::Rotate90);
        assert_eq!(" r270 ".parse::<Transform>().unwrap(), Transform::Rotate270);
        assert_eq!("Mirror-H".parse::<Transform>().unwrap(), Transform::FlipHorizontal);
        assert_eq!("flip_vertical".parse::<Transform>().unwrap(), Transform::FlipVertical);
        assert_eq!("diag-nwse".parse::<Transform>().unwrap(), Transform::FlipDiagonalNwSe);
        assert_eq!("flip-diag-nesw".parse::<Transform>().unwrap(), Transform::FlipDiagonalNeSw);
        assert!("rot45".parse::<Transform>().is_err());

        for t in Transform::ALL {
            assert_eq!(t.to_string().parse::<Transform>().unwrap(), t);
        }
    }
}
