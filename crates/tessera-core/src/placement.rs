//! A tile committed to a cell in a specific orientation.

use crate::color::Color;
use crate::direction::Direction;
use crate::tile::{Tile, TileId};

/// One oriented tile occupying one cell: the tile's id, its clockwise
/// quarter-turn rotation, and the resulting edge tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    tile: TileId,
    rotation: u8,
    edges: [Color; 4],
}

impl Placement {
    /// Derive a placement from a tile and a rotation in `0..4`.
    pub fn new(tile: &Tile, rotation: u8) -> Placement {
        let rotation = rotation & 3;
        Placement {
            tile: tile.id(),
            rotation,
            edges: *tile.edges_rotated(rotation as i32),
        }
    }

    /// Id of the placed tile.
    #[inline]
    pub const fn tile(&self) -> TileId {
        self.tile
    }

    /// Clockwise quarter-turn rotation in `0..4`.
    #[inline]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// The oriented edge tuple in `[N, E, S, W]` order.
    #[inline]
    pub fn edges(&self) -> &[Color; 4] {
        &self.edges
    }

    /// The color presented on one side.
    #[inline]
    pub fn edge(&self, side: Direction) -> Color {
        self.edges[side.index()]
    }
}
