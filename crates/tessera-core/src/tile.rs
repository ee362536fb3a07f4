//! Immutable tiles with cached rotations, and the shared tile set.

use std::fmt;

use crate::color::Color;
use crate::direction::Direction;
use crate::error::PuzzleError;

/// Identity of a tile. Positive and unique within a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u16);

impl TileId {
    /// Wrap a raw id. Callers guarantee the value is positive; the puzzle
    /// constructor rejects zero ids before any `TileId` escapes.
    pub const fn new(raw: u16) -> TileId {
        TileId(raw)
    }

    /// The raw id value.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification by number of frame-colored edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Two or more frame edges; belongs in a board corner.
    Corner,
    /// Exactly one frame edge; belongs on the frame.
    Edge,
    /// No frame edges; belongs in the interior.
    Interior,
}

/// An immutable square tile: an id plus four edge colors in `[N, E, S, W]`
/// order, with all four rotated variants precomputed.
///
/// Rotation is clockwise, 90° per unit: after one rotation the edge that
/// faced north faces east. Tiles are shared read-only across workers, so
/// accessors return borrowed views of the cached rotations rather than
/// fresh copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    /// `rotated[k]` is the edge tuple after `k` clockwise quarter turns;
    /// `rotated[0]` is the base tuple.
    rotated: [[Color; 4]; 4],
    /// 1, 2, or 4: how many of the rotated tuples are distinct.
    distinct_rotations: u8,
}

impl Tile {
    /// Build a tile from its base edge tuple, precomputing rotations.
    pub fn new(id: TileId, edges: [Color; 4]) -> Tile {
        let mut rotated = [[Color::FRAME; 4]; 4];
        for (k, tuple) in rotated.iter_mut().enumerate() {
            for (i, slot) in tuple.iter_mut().enumerate() {
                *slot = edges[(i + 4 - k) % 4];
            }
        }
        // Rotational symmetry is cyclic, so the period is 1, 2, or 4.
        let distinct_rotations = if rotated[1] == rotated[0] {
            1
        } else if rotated[2] == rotated[0] {
            2
        } else {
            4
        };
        Tile {
            id,
            rotated,
            distinct_rotations,
        }
    }

    /// The tile's identity.
    #[inline]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// The unrotated edge tuple.
    #[inline]
    pub fn base_edges(&self) -> &[Color; 4] {
        &self.rotated[0]
    }

    /// The edge tuple after `k` clockwise quarter turns.
    ///
    /// Accepts any integer: `edges_rotated(k) == edges_rotated(k mod 4)`,
    /// including negative `k`.
    #[inline]
    pub fn edges_rotated(&self, k: i32) -> &[Color; 4] {
        &self.rotated[k.rem_euclid(4) as usize]
    }

    /// One edge of the tile rotated by `rotation` quarter turns.
    #[inline]
    pub fn edge(&self, rotation: u8, side: Direction) -> Color {
        self.rotated[(rotation & 3) as usize][side.index()]
    }

    /// How many distinct orientations this tile has (1, 2, or 4).
    ///
    /// Enumerating rotations `0..distinct_rotations()` visits every
    /// distinct edge tuple exactly once, which is what suppresses
    /// redundant symmetric placements.
    #[inline]
    pub const fn distinct_rotations(&self) -> u8 {
        self.distinct_rotations
    }

    /// Number of frame-colored edges on the base tuple.
    pub fn frame_edge_count(&self) -> usize {
        self.rotated[0].iter().filter(|c| c.is_frame()).count()
    }

    /// Classify this tile by its frame-edge count.
    pub fn kind(&self) -> TileKind {
        match self.frame_edge_count() {
            0 => TileKind::Interior,
            1 => TileKind::Edge,
            _ => TileKind::Corner,
        }
    }
}

/// The immutable set of tiles for one puzzle, shared by all workers.
///
/// Lookup by id is O(1) via a dense id → slot table.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    /// Indexed by raw id value; `slot + 1`, with 0 meaning "no such tile".
    by_id: Vec<u32>,
    max_id: u16,
}

impl TileSet {
    /// Build a tile set, rejecting zero or duplicate ids.
    pub fn new(tiles: Vec<Tile>) -> Result<TileSet, PuzzleError> {
        let max_id = tiles.iter().map(|t| t.id().get()).max().unwrap_or(0);
        let mut by_id = vec![0u32; max_id as usize + 1];
        for (slot, tile) in tiles.iter().enumerate() {
            let raw = tile.id().get();
            if raw == 0 {
                return Err(PuzzleError::ZeroTileId);
            }
            if by_id[raw as usize] != 0 {
                return Err(PuzzleError::DuplicateTileId { id: tile.id() });
            }
            by_id[raw as usize] = slot as u32 + 1;
        }
        Ok(TileSet {
            tiles,
            by_id,
            max_id,
        })
    }

    /// Look up a tile by id.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        let raw = id.get() as usize;
        if raw >= self.by_id.len() {
            return None;
        }
        match self.by_id[raw] {
            0 => None,
            slot => Some(&self.tiles[slot as usize - 1]),
        }
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Largest raw id value in the set.
    pub fn max_id(&self) -> u16 {
        self.max_id
    }

    /// Iterate over the tiles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(values: [u8; 4]) -> [Color; 4] {
        values.map(Color::new)
    }

    #[test]
    fn rotation_shifts_clockwise() {
        let t = Tile::new(TileId::new(1), colors([1, 2, 3, 4]));
        assert_eq!(t.edges_rotated(0), &colors([1, 2, 3, 4]));
        // After one clockwise turn the old north edge faces east.
        assert_eq!(t.edges_rotated(1), &colors([4, 1, 2, 3]));
        assert_eq!(t.edges_rotated(2), &colors([3, 4, 1, 2]));
        assert_eq!(t.edges_rotated(3), &colors([2, 3, 4, 1]));
    }

    #[test]
    fn rotation_wraps_mod_four() {
        let t = Tile::new(TileId::new(1), colors([1, 2, 3, 4]));
        for k in -8i32..=8 {
            assert_eq!(
                t.edges_rotated(k),
                t.edges_rotated(k.rem_euclid(4)),
                "k={k}"
            );
        }
    }

    #[test]
    fn rotation_round_trips() {
        let t = Tile::new(TileId::new(1), colors([1, 2, 3, 4]));
        for k in 0i32..4 {
            let forward = *t.edges_rotated(k);
            let back = Tile::new(TileId::new(2), forward);
            assert_eq!(back.edges_rotated(4 - k), t.base_edges());
        }
    }

    #[test]
    fn distinct_rotation_counts() {
        assert_eq!(
            Tile::new(TileId::new(1), colors([5, 5, 5, 5])).distinct_rotations(),
            1
        );
        assert_eq!(
            Tile::new(TileId::new(2), colors([1, 2, 1, 2])).distinct_rotations(),
            2
        );
        assert_eq!(
            Tile::new(TileId::new(3), colors([1, 2, 3, 4])).distinct_rotations(),
            4
        );
        assert_eq!(
            Tile::new(TileId::new(4), colors([1, 1, 2, 2])).distinct_rotations(),
            4
        );
    }

    #[test]
    fn kind_by_frame_edges() {
        assert_eq!(
            Tile::new(TileId::new(1), colors([0, 1, 2, 0])).kind(),
            TileKind::Corner
        );
        assert_eq!(
            Tile::new(TileId::new(2), colors([0, 1, 2, 3])).kind(),
            TileKind::Edge
        );
        assert_eq!(
            Tile::new(TileId::new(3), colors([1, 2, 3, 4])).kind(),
            TileKind::Interior
        );
    }

    #[test]
    fn tile_set_lookup() {
        let set = TileSet::new(vec![
            Tile::new(TileId::new(3), colors([0, 1, 1, 0])),
            Tile::new(TileId::new(7), colors([1, 2, 3, 4])),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.max_id(), 7);
        assert_eq!(set.get(TileId::new(7)).unwrap().id(), TileId::new(7));
        assert!(set.get(TileId::new(4)).is_none());
        assert!(set.get(TileId::new(100)).is_none());
    }

    #[test]
    fn tile_set_rejects_duplicates() {
        let err = TileSet::new(vec![
            Tile::new(TileId::new(3), colors([0, 1, 1, 0])),
            Tile::new(TileId::new(3), colors([1, 2, 3, 4])),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            PuzzleError::DuplicateTileId {
                id: TileId::new(3)
            }
        );
    }

    #[test]
    fn tile_set_rejects_zero_id() {
        let err = TileSet::new(vec![Tile::new(TileId::new(0), colors([0, 1, 1, 0]))])
            .unwrap_err();
        assert_eq!(err, PuzzleError::ZeroTileId);
    }
}
