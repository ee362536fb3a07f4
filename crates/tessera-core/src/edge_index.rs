//! Per-(side, color) candidate index and per-tile difficulty scores.

use crate::color::Color;
use crate::direction::Direction;
use crate::tile::{TileId, TileSet};

/// Read-only index built once from the tile set.
///
/// For each compass side and each color value it lists every
/// `(tile, rotation)` presenting that color on that side, enumerating only
/// the tile's distinct rotations so symmetric duplicates never appear.
/// It also carries a per-tile *difficulty score*: the sum over the four
/// base sides of `1 / |other tiles offering that color on the opposite
/// side|`. A side whose color no other tile can answer contributes a full
/// point, making near-unmatchable tiles sort as hardest.
#[derive(Debug)]
pub struct EdgeIndex {
    /// `by_side[side][color] -> (tile, rotation)` entries, grouped by tile.
    by_side: [Vec<Vec<(TileId, u8)>>; 4],
    /// `tiles_by_side[side][color]`: count of distinct tiles in the list.
    tiles_by_side: [Vec<usize>; 4],
    /// Indexed by raw tile id.
    difficulty: Vec<f64>,
    color_count: usize,
}

impl EdgeIndex {
    /// Build the index. O(tiles × rotations).
    pub fn build(tiles: &TileSet) -> EdgeIndex {
        let color_count = tiles
            .iter()
            .flat_map(|t| t.base_edges().iter())
            .map(|c| c.value() as usize + 1)
            .max()
            .unwrap_or(1);

        let mut by_side: [Vec<Vec<(TileId, u8)>>; 4] =
            std::array::from_fn(|_| vec![Vec::new(); color_count]);
        let mut tiles_by_side: [Vec<usize>; 4] =
            std::array::from_fn(|_| vec![0; color_count]);

        for tile in tiles.iter() {
            for rotation in 0..tile.distinct_rotations() {
                let edges = tile.edges_rotated(rotation as i32);
                for side in Direction::ALL {
                    let color = edges[side.index()].value() as usize;
                    let list = &mut by_side[side.index()][color];
                    // Entries are pushed tile by tile, so a distinct-tile
                    // count only needs to look at the previous entry.
                    if list.last().map(|(id, _)| *id) != Some(tile.id()) {
                        tiles_by_side[side.index()][color] += 1;
                    }
                    list.push((tile.id(), rotation));
                }
            }
        }

        let mut difficulty = vec![0.0; tiles.max_id() as usize + 1];
        for tile in tiles.iter() {
            let mut score = 0.0;
            for side in Direction::ALL {
                let color = tile.base_edges()[side.index()];
                if color.is_frame() {
                    continue;
                }
                let opposite = side.opposite();
                let mut partners = tiles_by_side[opposite.index()][color.value() as usize];
                // The tile itself cannot be its own neighbor.
                if by_side[opposite.index()][color.value() as usize]
                    .iter()
                    .any(|(id, _)| *id == tile.id())
                {
                    partners -= 1;
                }
                score += if partners == 0 {
                    1.0
                } else {
                    1.0 / partners as f64
                };
            }
            difficulty[tile.id().get() as usize] = score;
        }

        EdgeIndex {
            by_side,
            tiles_by_side,
            difficulty,
            color_count,
        }
    }

    /// All `(tile, rotation)` entries presenting `color` on `side`.
    pub fn candidates(&self, side: Direction, color: Color) -> &[(TileId, u8)] {
        let c = color.value() as usize;
        if c >= self.color_count {
            return &[];
        }
        &self.by_side[side.index()][c]
    }

    /// Count of distinct tiles presenting `color` on `side`.
    pub fn tile_count(&self, side: Direction, color: Color) -> usize {
        let c = color.value() as usize;
        if c >= self.color_count {
            return 0;
        }
        self.tiles_by_side[side.index()][c]
    }

    /// Difficulty score for a tile; higher means harder to match.
    pub fn difficulty(&self, id: TileId) -> f64 {
        self.difficulty
            .get(id.get() as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// One past the largest color value seen.
    pub fn color_count(&self) -> usize {
        self.color_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    fn tile(id: u16, edges: [u8; 4]) -> Tile {
        Tile::new(TileId::new(id), edges.map(Color::new))
    }

    fn build(tiles: Vec<Tile>) -> EdgeIndex {
        EdgeIndex::build(&TileSet::new(tiles).unwrap())
    }

    #[test]
    fn candidates_cover_all_distinct_rotations() {
        let index = build(vec![tile(1, [0, 1, 1, 0]), tile(2, [1, 2, 3, 4])]);
        // Tile 2 presents color 2 on its east side in rotation 0 and, after
        // one clockwise turn, on south ([4,1,2,3]).
        let east = index.candidates(Direction::East, Color::new(2));
        assert!(east.contains(&(TileId::new(2), 0)));
        let south = index.candidates(Direction::South, Color::new(2));
        assert!(south.contains(&(TileId::new(2), 1)));
    }

    #[test]
    fn symmetric_tiles_are_not_duplicated() {
        // [1,2,1,2] has two distinct rotations only.
        let index = build(vec![tile(1, [1, 2, 1, 2])]);
        let north_1 = index.candidates(Direction::North, Color::new(1));
        assert_eq!(north_1, &[(TileId::new(1), 0)]);
        let north_2 = index.candidates(Direction::North, Color::new(2));
        assert_eq!(north_2, &[(TileId::new(1), 1)]);
    }

    #[test]
    fn tile_count_is_distinct_tiles_not_rotations() {
        // Tile 1 presents color 1 on north in two rotations; still one tile.
        let index = build(vec![tile(1, [1, 5, 1, 6]), tile(2, [1, 2, 3, 4])]);
        assert_eq!(index.tile_count(Direction::North, Color::new(1)), 2);
    }

    #[test]
    fn difficulty_is_higher_for_rarer_colors() {
        // Color 9 appears on tile 1 only; color 1 is shared widely.
        let index = build(vec![
            tile(1, [9, 1, 1, 1]),
            tile(2, [1, 1, 1, 1]),
            tile(3, [1, 1, 1, 1]),
        ]);
        assert!(index.difficulty(TileId::new(1)) > index.difficulty(TileId::new(2)));
    }

    #[test]
    fn frame_sides_do_not_contribute_difficulty() {
        let index = build(vec![tile(1, [0, 0, 0, 0]), tile(2, [1, 1, 1, 1])]);
        assert_eq!(index.difficulty(TileId::new(1)), 0.0);
    }

    #[test]
    fn unknown_color_has_no_candidates() {
        let index = build(vec![tile(1, [0, 1, 1, 0])]);
        assert!(index.candidates(Direction::North, Color::new(200)).is_empty());
        assert_eq!(index.tile_count(Direction::East, Color::new(200)), 0);
    }
}
