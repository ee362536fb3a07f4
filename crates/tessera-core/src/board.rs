//! The mutable board: a grid of optional placements plus a usage bitset.

use crate::direction::Direction;
use crate::error::BoardError;
use crate::placement::Placement;
use crate::tile::{Tile, TileId};
use crate::used::UsedTiles;
use crate::zobrist;

/// Partial-score summary: matched interior borders out of the maximum
/// possible for the board's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Interior borders whose two edges currently agree.
    pub matched: usize,
    /// `(R-1)*C + R*(C-1)`, the count of interior borders.
    pub max: usize,
}

/// An R×C grid of optional placements.
///
/// Invariants maintained by `place`/`remove`:
/// - every tile id appears at most once, and the usage bitset mirrors the
///   grid exactly;
/// - the 64-bit hash is the XOR of one key per current placement, so a
///   place followed by the matching remove restores the previous hash
///   bit-for-bit.
///
/// Edge agreement between neighbors is *not* enforced here; that is the
/// fit checker's contract, applied by callers before placing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Placement>>,
    used: UsedTiles,
    hash: u64,
}

impl Board {
    /// Empty board able to hold tile ids up to `max_tile_id`.
    pub fn new(rows: usize, cols: usize, max_tile_id: u16) -> Board {
        Board {
            rows,
            cols,
            cells: vec![None; rows * cols],
            used: UsedTiles::new(max_tile_id),
            hash: 0,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// How many cells currently hold a placement.
    #[inline]
    pub fn placed_count(&self) -> usize {
        self.used.len()
    }

    /// Whether every cell holds a placement.
    pub fn is_complete(&self) -> bool {
        self.used.len() == self.cells.len()
    }

    /// Row-major index of a cell.
    #[inline]
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Whether the cell at (row, col) is empty.
    #[inline]
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cells[self.cell_index(row, col)].is_none()
    }

    /// The placement at (row, col), if any.
    #[inline]
    pub fn placement(&self, row: usize, col: usize) -> Option<&Placement> {
        self.cells[self.cell_index(row, col)].as_ref()
    }

    /// Whether the given tile id is currently placed anywhere.
    #[inline]
    pub fn is_used(&self, id: TileId) -> bool {
        self.used.contains(id)
    }

    /// The usage bitset.
    #[inline]
    pub fn used(&self) -> &UsedTiles {
        &self.used
    }

    /// Incremental hash over all current placements.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Coordinates of the adjacent cell in `side`, if it is on the board.
    pub fn neighbor(&self, row: usize, col: usize, side: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = side.delta();
        let nr = row as i32 + dr;
        let nc = col as i32 + dc;
        if nr < 0 || nc < 0 || nr as usize >= self.rows || nc as usize >= self.cols {
            None
        } else {
            Some((nr as usize, nc as usize))
        }
    }

    /// Write a placement and set the usage bit.
    ///
    /// Placing into a filled cell or reusing a placed tile is a caller
    /// bug: debug builds panic, release builds return the error untouched.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        tile: &Tile,
        rotation: u8,
    ) -> Result<(), BoardError> {
        if row >= self.rows || col >= self.cols {
            debug_assert!(
                false,
                "place({row}, {col}) outside {}x{} board",
                self.rows, self.cols
            );
            return Err(BoardError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.cell_index(row, col);
        if self.cells[idx].is_some() {
            debug_assert!(false, "place({row}, {col}) into occupied cell");
            return Err(BoardError::CellOccupied { row, col });
        }
        if self.used.contains(tile.id()) {
            debug_assert!(false, "tile {} placed twice", tile.id());
            return Err(BoardError::TileInUse { tile: tile.id() });
        }
        let placement = Placement::new(tile, rotation);
        self.used.insert(tile.id());
        self.hash ^= zobrist::placement_key(idx, tile.id().get(), placement.rotation());
        self.cells[idx] = Some(placement);
        Ok(())
    }

    /// Clear a cell and its usage bit, returning the removed placement.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Placement> {
        let idx = self.cell_index(row, col);
        let placement = self.cells[idx].take()?;
        self.used.remove(placement.tile());
        self.hash ^= zobrist::placement_key(idx, placement.tile().get(), placement.rotation());
        Some(placement)
    }

    /// Count matched interior borders against the maximum possible.
    pub fn calculate_score(&self) -> Score {
        let max = (self.rows.saturating_sub(1)) * self.cols
            + self.rows * (self.cols.saturating_sub(1));
        let mut matched = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(here) = self.placement(row, col) else {
                    continue;
                };
                // Count each border once, from its west/north side.
                if col + 1 < self.cols
                    && let Some(east) = self.placement(row, col + 1)
                    && here.edge(Direction::East) == east.edge(Direction::West)
                {
                    matched += 1;
                }
                if row + 1 < self.rows
                    && let Some(south) = self.placement(row + 1, col)
                    && here.edge(Direction::South) == south.edge(Direction::North)
                {
                    matched += 1;
                }
            }
        }
        Score { matched, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn tile(id: u16, edges: [u8; 4]) -> Tile {
        Tile::new(TileId::new(id), edges.map(Color::new))
    }

    #[test]
    fn place_and_remove_restore_board() {
        let t = tile(1, [0, 1, 1, 0]);
        let mut board = Board::new(2, 2, 4);
        let before = board.clone();
        board.place(0, 0, &t, 0).unwrap();
        assert!(!board.is_empty(0, 0));
        assert!(board.is_used(TileId::new(1)));
        assert_ne!(board.hash(), before.hash());

        let removed = board.remove(0, 0).unwrap();
        assert_eq!(removed.tile(), TileId::new(1));
        assert_eq!(board, before);
    }

    #[test]
    fn usage_bit_tracks_grid() {
        let a = tile(1, [0, 1, 1, 0]);
        let b = tile(2, [0, 0, 1, 1]);
        let mut board = Board::new(2, 2, 4);
        board.place(0, 0, &a, 0).unwrap();
        board.place(0, 1, &b, 0).unwrap();
        assert_eq!(board.placed_count(), 2);
        board.remove(0, 0);
        assert!(!board.is_used(TileId::new(1)));
        assert!(board.is_used(TileId::new(2)));
        assert_eq!(board.placed_count(), 1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "occupied"))]
    fn double_place_is_rejected() {
        let a = tile(1, [0, 1, 1, 0]);
        let b = tile(2, [0, 0, 1, 1]);
        let mut board = Board::new(2, 2, 4);
        board.place(0, 0, &a, 0).unwrap();
        let result = board.place(0, 0, &b, 0);
        // Only reached in release builds.
        assert_eq!(result, Err(BoardError::CellOccupied { row: 0, col: 0 }));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "placed twice"))]
    fn tile_reuse_is_rejected() {
        let a = tile(1, [0, 1, 1, 0]);
        let mut board = Board::new(2, 2, 4);
        board.place(0, 0, &a, 0).unwrap();
        let result = board.place(1, 1, &a, 2);
        assert_eq!(
            result,
            Err(BoardError::TileInUse {
                tile: TileId::new(1)
            })
        );
    }

    #[test]
    fn score_counts_matched_borders() {
        // Perfect 2x2 from four interlocking corner tiles.
        let tiles = [
            (tile(1, [0, 1, 1, 0]), 0, 0, 0u8),
            (tile(2, [0, 0, 1, 1]), 0, 1, 0u8),
            (tile(4, [1, 0, 0, 1]), 1, 0, 1u8),
            (tile(3, [1, 1, 0, 0]), 1, 1, 3u8),
        ];
        let mut board = Board::new(2, 2, 4);
        assert_eq!(board.calculate_score(), Score { matched: 0, max: 4 });
        for (t, r, c, rot) in &tiles {
            board.place(*r, *c, t, *rot).unwrap();
        }
        let score = board.calculate_score();
        assert_eq!(score.max, 4);
        assert_eq!(score.matched, 4);
    }

    #[test]
    fn score_max_for_one_by_one() {
        let board = Board::new(1, 1, 1);
        assert_eq!(board.calculate_score(), Score { matched: 0, max: 0 });
    }

    #[test]
    fn hash_is_order_independent() {
        let a = tile(1, [0, 1, 1, 0]);
        let b = tile(2, [0, 0, 1, 1]);
        let mut first = Board::new(2, 2, 4);
        first.place(0, 0, &a, 0).unwrap();
        first.place(0, 1, &b, 0).unwrap();
        let mut second = Board::new(2, 2, 4);
        second.place(0, 1, &b, 0).unwrap();
        second.place(0, 0, &a, 0).unwrap();
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn neighbor_respects_bounds() {
        let board = Board::new(2, 3, 6);
        assert_eq!(board.neighbor(0, 0, Direction::North), None);
        assert_eq!(board.neighbor(0, 0, Direction::West), None);
        assert_eq!(board.neighbor(0, 0, Direction::East), Some((0, 1)));
        assert_eq!(board.neighbor(0, 0, Direction::South), Some((1, 0)));
        assert_eq!(board.neighbor(1, 2, Direction::East), None);
        assert_eq!(board.neighbor(1, 2, Direction::South), None);
    }
}
