mod common;

use c2m::map::{Direction, TileId, decode_map, encode_map};
use c2m::{MapGrid, TileSpec, Transform};
use common::grid;
use proptest::prelude::*;

fn apply_n(grid: &MapGrid, t: Transform, n: usize) -> MapGrid {
    (0..n).fold(grid.clone(), |g, _| t.apply(&g))
}

#[test]
fn test_rotate90_moves_and_turns() {
    let grid = MapGrid::new(
        2,
        1,
        vec![
            TileSpec::new(TileId::FORCE_N),
            TileSpec::new(TileId::WALL),
        ],
    )
    .unwrap();
    let turned = grid.transformed(Transform::Rotate90);

    // (x, y) -> (h - 1 - y, x)
    assert_eq!((turned.width(), turned.height()), (1, 2));
    assert_eq!(turned.get(0, 0).map(|t| t.tile), Some(TileId::FORCE_E));
    assert_eq!(turned.get(0, 1).map(|t| t.tile), Some(TileId::WALL));
}

#[test]
fn test_transformed_map_still_encodes() {
    let bytes = [3, 1, 0x16, 0x00, 0x01, 0x02, 0x0D];
    let grid = decode_map(&bytes).unwrap();
    let flipped = grid.transformed(Transform::FlipHorizontal);
    let out = encode_map(&flipped).unwrap();

    // FORCE_W becomes FORCE_E and leads; Chip still faces north
    assert_eq!(out, vec![3, 1, 0x0B, 0x02, 0x16, 0x00, 0x01]);
    assert_eq!(flipped.get(2, 0).and_then(|t| t.dir), Some(Direction::North));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_group_laws(grid in grid()) {
        prop_assert_eq!(apply_n(&grid, Transform::Rotate90, 4), grid.clone());
        prop_assert_eq!(apply_n(&grid, Transform::Rotate180, 2), grid.clone());
        prop_assert_eq!(apply_n(&grid, Transform::Rotate270, 4), grid.clone());
        for flip in [
            Transform::FlipHorizontal,
            Transform::FlipVertical,
            Transform::FlipDiagonalNwSe,
            Transform::FlipDiagonalNeSw,
        ] {
            prop_assert_eq!(apply_n(&grid, flip, 2), grid.clone(), "{}", flip);
        }

        let rot180 = Transform::Rotate180.apply(&grid);
        prop_assert_eq!(apply_n(&grid, Transform::Rotate90, 2), rot180.clone());
        prop_assert_eq!(Transform::FlipVertical.apply(&Transform::FlipHorizontal.apply(&grid)), rot180);
    }

    #[test]
    fn prop_inverse_undoes(grid in grid(), index in 0usize..7) {
        let t = Transform::ALL[index];
        prop_assert_eq!(t.inverse().apply(&t.apply(&grid)), grid);
    }

    #[test]
    fn prop_transformed_grids_encode(grid in grid(), index in 0usize..7) {
        let t = Transform::ALL[index];
        let out = t.apply(&grid);
        let bytes = encode_map(&out).unwrap();
        prop_assert_eq!(decode_map(&bytes).unwrap(), out);
    }
}
